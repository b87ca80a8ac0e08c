//! Units Data Size - Conversion between bytes and IEC/SI multiples
//!
//! Provides the `data_size` data source and per-unit conversion functions.
//!
//! Units:
//! - Canonical: bytes
//! - Binary (powers of 1024): KiB, MiB, GiB, TiB, PiB
//! - Decimal (powers of 1000): KB, MB, GB, TB, PB
//!
//! Every conversion goes through bytes: a value is scaled up to bytes and
//! then scaled down to each other unit.

mod unit;
mod scale;
mod convert;
mod functions;
mod datasource;

pub use unit::{DataSizeUnit, Family, UnknownUnit, UNIT_COUNT};
pub use scale::Scale;
pub use convert::{convert, DataSize, ConversionRequest, ConversionResult};
pub use datasource::DataSizeSource;

use units_plugin::PluginRegistry;

/// Load the data size data source and functions into registry
pub fn load_data_size_library(registry: PluginRegistry) -> PluginRegistry {
    let registry = registry.with_data_source(DataSizeSource);
    functions::register(registry)
}
