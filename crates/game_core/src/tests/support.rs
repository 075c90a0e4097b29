use host_integration::{RandomSource, RngSource, VirtualContainer};
use shared::domain::{Color, RoundSize, Size};

use crate::GameController;

pub const CONTAINER: Size = Size::new(640, 480);
pub const FOOTPRINT: Size = Size::new(96, 48);

/// Always picks the largest allowed coordinate.
pub struct MaxRandom;

impl RandomSource for MaxRandom {
    fn sample_coordinate(&mut self, max: u32) -> u32 {
        max
    }

    fn sample_color(&mut self) -> Color {
        Color::from_rgb24(0x336699)
    }
}

pub fn round_size(value: i64) -> RoundSize {
    RoundSize::new(value).expect("valid round size")
}

pub fn seeded_controller() -> (GameController, VirtualContainer) {
    let container = VirtualContainer::new(CONTAINER, FOOTPRINT);
    let controller = GameController::new(container.clone(), RngSource::seeded(1234));
    (controller, container)
}

/// Starts a round and runs every scramble iteration, leaving the controller in Testing.
pub fn controller_in_testing(size: i64) -> (GameController, VirtualContainer) {
    let (mut controller, container) = seeded_controller();
    let size = round_size(size);
    controller.start(size).expect("start");
    for _ in 0..size.get() {
        controller.scramble_step().expect("scramble");
    }
    assert!(controller.enter_testing());
    controller.take_events();
    (controller, container)
}
