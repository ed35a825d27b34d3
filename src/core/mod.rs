pub mod axes;
pub mod candlestick;
pub mod price_scale;
pub mod primitives;
pub mod scale;
pub mod time_scale;
pub mod types;

pub use axes::{ChartAxes, LinearChartAxes};
pub use candlestick::OhlcBar;
pub use price_scale::PriceScale;
pub use scale::LinearScale;
pub use time_scale::TimeScale;
pub use types::{ScreenPoint, Viewport};
