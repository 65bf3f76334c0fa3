#[macro_use]
extern crate criterion;
extern crate mandelzoom;

use criterion::Criterion;
use mandelzoom::{colorize, FractalField, GradientPalette, GradientSpec, Viewport};

fn recompute(c: &mut Criterion) {
    let vp = Viewport::centered(-2.0, 1.0, 160, 100).unwrap();
    c.bench_function("recompute 160x100 @ 256", move |b| {
        let mut field = FractalField::new(vp, 160, 100, 256).unwrap();
        b.iter(|| field.recompute(vp, 160, 100, 256).unwrap().counts().len())
    });
}

fn colorize_frame(c: &mut Criterion) {
    let vp = Viewport::centered(-2.0, 1.0, 160, 100).unwrap();
    let field = FractalField::new(vp, 160, 100, 256).unwrap();
    let palette = GradientPalette::new(GradientSpec::default()).unwrap();
    c.bench_function("colorize 160x100", move |b| {
        b.iter(|| colorize(field.matrix(), &palette).unwrap())
    });
}

fn cycle_table(c: &mut Criterion) {
    c.bench_function("cycle 256-entry table", |b| {
        let mut palette = GradientPalette::default();
        b.iter(|| palette.cycle())
    });
}

criterion_group!(benches, recompute, colorize_frame, cycle_table);
criterion_main!(benches);
