extern crate piecewise_spline;

use piecewise_spline::{Surface, SurfaceBuilder, SurfaceKind};

fn main() {

    let x: [f64; 5] = [0.0, 1.0, 2.0, 3.0, 4.0];
    let y = [0.0, 0.5, 1.5, 2.0];
    let z: Vec<f64> = x
        .iter()
        .flat_map(|x| y.iter().map(move |y| (x * 0.7).sin() * (1.0 + y)))
        .collect();

    let surfaces: Vec<_> = SurfaceKind::ALL
        .iter()
        .map(|kind| SurfaceBuilder::new(*kind).build(&x, &y, &z).unwrap())
        .collect();

    let number_of_steps = 40;
    let step = (x[4] - x[0]) / number_of_steps as f64;
    let along = 1.0;

    let header: Vec<&str> = SurfaceKind::ALL.iter().map(|kind| kind.name()).collect();
    println!("x;{}", header.join(";"));
    for i in 0..=number_of_steps {
        let x = x[0] + step * i as f64;
        let row: Vec<String> = surfaces
            .iter()
            .map(|surface| format!("{:.3}", surface.eval(x, along).unwrap()))
            .collect();
        println!("{:.2};{}", x, row.join(";"));
    }
}
