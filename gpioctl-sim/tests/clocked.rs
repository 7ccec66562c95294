use gpioctl_sim::{ Clock, Clocked, Simulation, Time, Error };
use gpioctl_sim::channel::{ Channel, Digital };

/// a divide-by-two clock, emits its output level on every edge
struct Divider {
    level: bool,
    clock: Clock,
    out: Channel<Digital>,
}

impl Clocked for Divider {
    fn step(&mut self) -> Result<(), Error> {
        self.clock.tick();
        if self.clock.ticks_elapsed() % 2 == 0 {
            self.level = !self.level;
            self.out.emit(&Digital::from_level(self.level, self.clock.ticks_elapsed()))?;
        }
        Ok(())
    }
}

struct Bench {
    elements: Vec<Box<dyn Clocked>>,
}

impl Simulation for Bench {
    fn run_for(&mut self, cycles: Time) -> Result<(), Error> {
        for _ in 0..cycles {
            for element in self.elements.iter_mut() {
                element.step()?;
            }
        }
        Ok(())
    }
}

#[test]
fn test_divider_bench() -> anyhow::Result<()> {
    env_logger::try_init().ok();

    let mut out = Channel::new_with("divider");
    let mut logger = out.get_logger();
    let divider = Divider { level: false, clock: Clock::new(), out };

    let mut bench = Bench { elements: vec![Box::new(divider)] };
    bench.run_for(6)?;

    logger.collect_pending();
    assert_eq!(logger.log(), &[Digital::Hi(2), Digital::Lo(4), Digital::Hi(6)]);
    assert!(logger.log().iter().all(|e| e.time() % 2 == 0));
    Ok(())
}
