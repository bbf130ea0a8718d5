use embedded_hal_mock::eh1::{delay::NoopDelay, digital::Mock as PinMock};
use turnmatrix::{
    interface::{PinInputs, PinMatrix},
    ConfigBuilder, Controller, TurnWindow,
};

fn main() {
    // placeholders, replace with instances from your HAL
    let rows: [PinMock; 6] = core::array::from_fn(|_| PinMock::new(&[]));
    let cols: [PinMock; 6] = core::array::from_fn(|_| PinMock::new(&[]));
    let turn_right = PinMock::new(&[]);
    let turn_left = PinMock::new(&[]);
    let hazard = PinMock::new(&[]);
    let delay = NoopDelay::new();

    let config = ConfigBuilder::priority_polling()
        .row_dwell_us(1_000)
        .turn_window(TurnWindow::WhileAsserted);

    let mut controller = Controller::new(
        &config,
        PinMatrix::new(rows, cols),
        PinInputs::new(turn_right, turn_left, hazard),
        delay,
    )
    .unwrap();

    // poll the controls and keep the matrix scanned, forever
    match controller.run() {
        Ok(never) => match never {},
        Err(err) => panic!("matrix pin failed: {err:?}"),
    }
}
