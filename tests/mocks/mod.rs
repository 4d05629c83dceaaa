pub mod mock_series_source;

pub use mock_series_source::MockSeriesSource;
