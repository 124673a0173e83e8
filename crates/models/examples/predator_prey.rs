//! Runs the predator-prey model and prints the trajectory as tab-separated
//! values, one row per recorded instant.

use sysdyn_core::{Event, Simulator};
use sysdyn_models::PredatorPrey;

fn main() {
    tracing_subscriber::fmt::init();

    let model = PredatorPrey::default();
    let mut sim = Simulator::builder()
        .entities(model.entities())
        .init_time(0.0)
        .max_time(100.0)
        .time_step(1.0)
        .build();

    sim.on(&[Event::Init], |_, _| {
        println!("time\tpredator\tprey");
    });
    sim.on(&[Event::Init, Event::Advance], |sim, time| {
        println!(
            "{time}\t{:.6}\t{:.6}",
            sim.value("predator"),
            sim.value("prey")
        );
    });

    sim.execute();
}
