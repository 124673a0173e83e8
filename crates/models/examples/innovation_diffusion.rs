//! Runs the innovation-diffusion model and prints the trajectory as
//! tab-separated values, one row per recorded instant.

use sysdyn_core::{Event, Simulator};
use sysdyn_models::InnovationDiffusion;

fn main() {
    tracing_subscriber::fmt::init();

    let model = InnovationDiffusion::default();
    let mut sim = Simulator::builder()
        .entities(model.entities())
        .init_time(0.0)
        .max_time(100.0)
        .time_step(0.25)
        .build();

    sim.on(&[Event::Init], |_, _| {
        println!("time\tpotential adopters\tadopters");
    });
    sim.on(&[Event::Init, Event::Advance], |sim, time| {
        println!(
            "{time}\t{:.6}\t{:.6}",
            sim.value("potentialAdopters"),
            sim.value("adopters")
        );
    });

    sim.execute();
}
