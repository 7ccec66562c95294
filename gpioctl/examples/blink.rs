use gpioctl::core::observer::TransactionLogger;
use gpioctl::core::{ Controller, GpioConfig, PinInputs };
use gpioctl::driver::Driver;

const LED: u8 = 1;
const SWITCH: u8 = 2;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GpioConfig::from_file(path)?,
        None => GpioConfig::default(),
    };

    let mut ctl = Controller::new_with(config)?;
    ctl.register_observer(TransactionLogger::new_boxed());
    let mut pads = ctl.pad_events();

    let mut drv = Driver::new(&mut ctl);
    drv.reset(1)?;
    drv.set_data_direction(LED, 0x00)?;

    for round in 0..8u32 {
        drv.set_pins(PinInputs::new_with(0, round & 1));
        drv.discrete_set(LED, 0x01)?;
        drv.idle(16)?;
        drv.discrete_clear(LED, 0x01)?;
        drv.idle(16)?;

        let switch = drv.discrete_read(SWITCH)?;
        log::info!("round {round}: switch = {switch}");
    }

    let elapsed = drv.controller().clock().elapsed_seconds();
    println!("pad activity:{}", pads.display_pending());
    println!("simulated {:.3}us", elapsed * 1e6);

    Ok(())
}
