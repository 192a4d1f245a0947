//! Hardware capability traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. The display driver, keypad
//! scanner, RTC, and non-volatile storage are external collaborators;
//! the core only calls through these seams.

pub mod actuator;
pub mod clock;
pub mod display;
pub mod indicator;
pub mod keypad;
pub mod sleep;
pub mod storage;

pub use actuator::{Gate, GateActuator, GatePosition};
pub use clock::{ClockError, TimeOfDay, WallClock};
pub use display::{CharDisplay, DISPLAY_COLS, DISPLAY_ROWS};
pub use indicator::Indicator;
pub use keypad::{Key, Keypad};
pub use sleep::SleepControl;
pub use storage::{ScheduleStorage, StorageError};
