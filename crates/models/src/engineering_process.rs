//! An engineering project with rework and reactive staffing.
//!
//! A fixed scope of work is burned down by a staffed team. A fraction of
//! completed work is flawed and, after a discovery delay, flows back into
//! the backlog. Management perceives the backlog with a lag and staffs
//! toward finishing the remaining work before the deadline.
//!
//! The model exercises every stateful entity kind: stocks for the backlog
//! and completed work, a first-order delay for rework discovery, smoothing
//! elements for perception and hiring, and a timer feeding the deadline
//! pressure.

use sysdyn_core::{Delay1, Entity, Flow, Parameter, Smooth, Stock, Timer};

/// Parameters for the engineering-process model.
pub struct EngineeringProcess {
    /// Total scope at the start, in tasks.
    pub initial_scope: f64,
    /// Tasks one person completes per week.
    pub productivity: f64,
    /// Fraction of completed work that is flawed.
    pub error_fraction: f64,
    /// Weeks until flawed work is discovered as rework.
    pub rework_discovery_time: f64,
    /// Weeks to perceive a change in the backlog.
    pub perception_time: f64,
    /// Weeks to adjust staffing to the desired level.
    pub staffing_delay: f64,
    /// Project deadline, in weeks from the start.
    pub deadline: f64,
}

impl Default for EngineeringProcess {
    fn default() -> Self {
        Self {
            initial_scope: 120.0,
            productivity: 0.25,
            error_fraction: 0.2,
            rework_discovery_time: 8.0,
            perception_time: 4.0,
            staffing_delay: 6.0,
            deadline: 40.0,
        }
    }
}

impl EngineeringProcess {
    /// Assembles the model's entities.
    #[must_use]
    pub fn entities(&self) -> Vec<Box<dyn Entity>> {
        vec![
            Box::new(Parameter::new("initialScope", self.initial_scope)),
            Box::new(Parameter::new("productivity", self.productivity)),
            Box::new(Parameter::new("errorFraction", self.error_fraction)),
            Box::new(Parameter::new("deadline", self.deadline)),
            Box::new(Timer::new("clock")),
            Box::new(
                Stock::new("workToDo")
                    .init_with(|sim| sim.value("initialScope"))
                    .derivative(|sim| {
                        sim.value("reworkDiscovery") - sim.value("completionRate")
                    }),
            ),
            Box::new(
                Stock::new("workDone").derivative(|sim| {
                    sim.value("completionRate") - sim.value("errorGeneration")
                }),
            ),
            Box::new(Flow::new("completionRate", |sim| {
                sim.value("staff") * sim.value("productivity")
            })),
            Box::new(Flow::new("errorGeneration", |sim| {
                sim.value("completionRate") * sim.value("errorFraction")
            })),
            Box::new(
                Delay1::new("reworkDiscovery")
                    .delay_time(self.rework_discovery_time)
                    .input(|sim| sim.value("errorGeneration")),
            ),
            Box::new(
                Smooth::new("perceivedWork")
                    .delay_time(self.perception_time)
                    .input(|sim| sim.value("workToDo").max(0.0))
                    .init_from_input(),
            ),
            Box::new(Flow::new("timeRemaining", |sim| {
                (sim.value("deadline") - sim.value("clock")).max(1.0)
            })),
            Box::new(Flow::new("desiredStaff", |sim| {
                sim.value("perceivedWork") / (sim.value("timeRemaining") * sim.value("productivity"))
            })),
            Box::new(
                Smooth::new("staff")
                    .delay_time(self.staffing_delay)
                    .input(|sim| sim.value("desiredStaff"))
                    .init_from_input(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use sysdyn_core::{LoggingSimulator, Simulator};

    fn run() -> LoggingSimulator {
        let mut sim = LoggingSimulator::new(
            Simulator::builder()
                .entities(EngineeringProcess::default().entities())
                .init_time(0.0)
                .max_time(40.0)
                .time_step(0.25)
                .build(),
        );
        sim.execute();
        sim
    }

    #[test]
    fn initial_staffing_matches_the_deadline_plan() {
        let mut sim = Simulator::builder()
            .entities(EngineeringProcess::default().entities())
            .max_time(40.0)
            .time_step(0.25)
            .build();
        sim.init();

        // 120 tasks / (40 weeks * 0.25 tasks/person/week)
        assert_relative_eq!(sim.value("perceivedWork"), 120.0);
        assert_relative_eq!(sim.value("desiredStaff"), 12.0);
        assert_relative_eq!(sim.value("staff"), 12.0);
    }

    #[test]
    fn completed_work_is_monotone_nondecreasing() {
        let sim = run();
        let log = sim.log();
        let done = log.series("workDone").unwrap();

        for pair in done.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
        assert!(done[done.len() - 1] > 60.0);
    }

    #[test]
    fn the_timer_tracks_logged_time() {
        let sim = run();
        let log = sim.log();

        assert_eq!(log.series("clock").unwrap(), log.time());
    }

    #[test]
    fn rework_discovery_lags_error_generation() {
        let sim = run();
        let log = sim.log();
        let errors = log.series("errorGeneration").unwrap();
        let discovered = log.series("reworkDiscovery").unwrap();

        // One week in, errors are being made but few have surfaced yet.
        let week_one = 4;
        assert!(errors[week_one] > 0.3);
        assert!(discovered[week_one] < errors[week_one] / 2.0);
    }

    #[test]
    fn backlog_shrinks_despite_rework() {
        let sim = run();

        assert!(sim.value("workToDo") < 30.0);
        assert!(sim.value("workDone") > sim.value("workToDo"));
    }
}
