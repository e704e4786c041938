pub mod frame;
pub mod measurement;
pub mod month;
pub mod operator;

pub use frame::MeasurementFrame;
pub use measurement::Measurement;
pub use month::MonthLabel;
pub use operator::{DisplayColor, Operator, PowerClass};
