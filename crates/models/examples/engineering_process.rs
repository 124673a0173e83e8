//! Runs the engineering-process model and prints backlog, completed work,
//! and staffing over the life of the project.

use sysdyn_core::{LoggingSimulator, Simulator};
use sysdyn_models::EngineeringProcess;

fn main() {
    tracing_subscriber::fmt::init();

    let model = EngineeringProcess::default();
    let mut sim = LoggingSimulator::new(
        Simulator::builder()
            .entities(model.entities())
            .init_time(0.0)
            .max_time(40.0)
            .time_step(0.25)
            .build(),
    );
    sim.execute();

    let log = sim.log();
    println!("time\twork to do\twork done\tstaff");
    for (i, time) in log.time().iter().enumerate() {
        println!(
            "{time}\t{:.4}\t{:.4}\t{:.4}",
            log.series("workToDo").expect("logged")[i],
            log.series("workDone").expect("logged")[i],
            log.series("staff").expect("logged")[i],
        );
    }
}
