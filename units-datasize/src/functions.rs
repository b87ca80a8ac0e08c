//! Per-unit conversion functions: `from_<abbrev>` and `to_<abbrev>`
//!
//! `from_gb(x)` reads `x` as gigabytes and returns bytes.
//! `to_gb(x)` reads `x` as bytes and returns gigabytes.

use units_plugin::prelude::*;
use units_core::Number;
use crate::DataSizeUnit;

const CATEGORY: &str = "data_size";

/// Shared argument handling for every generated function
fn call_scaled(func: &str, arg: &str, args: &[Value], apply: impl Fn(&Number) -> Number) -> Value {
    if args.len() != 1 {
        return Value::Error(UnitsError::arg_count(func, 1, args.len()));
    }

    let value = match &args[0] {
        Value::Number(n) => n.clone(),
        Value::Text(s) => match Number::from_str(s) {
            Ok(n) => n,
            Err(e) => return Value::Error(UnitsError::from(e).in_source(func).at_attribute(arg)),
        },
        Value::Null => return Value::Error(UnitsError::arg_null(func, arg)),
        Value::Error(e) => return Value::Error(e.clone()),
        other => return Value::Error(UnitsError::arg_type(func, arg, "Number", other.type_name())),
    };

    tracing::trace!(function = func, value = %value, "converting data size");
    Value::Number(apply(&value))
}

macro_rules! data_size_functions {
    ($( $unit:ident => $from:ident, $to:ident, $full:literal, $abbrev:literal, $bytes:literal; )*) => {
        $(
            pub struct $from;

            impl FunctionPlugin for $from {
                fn meta(&self) -> FunctionMeta {
                    const ARGS: &[ArgMeta] = &[
                        ArgMeta::required(
                            $full,
                            "Number",
                            concat!("Data size in ", $full),
                            concat!("Data size in **", $full, "**"),
                        ),
                    ];
                    FunctionMeta {
                        name: concat!("from_", $abbrev),
                        summary: concat!("Converts ", $full, " to bytes"),
                        description: concat!("Given data size in ", $full, ", converts it to bytes."),
                        markdown_description: concat!("Given data size in **", $full, "**, converts it to **bytes**."),
                        usage: concat!("from_", $abbrev, "(", $full, ")"),
                        args: ARGS,
                        returns: "Number",
                        examples: &[concat!("from_", $abbrev, "(1) → ", $bytes)],
                        category: CATEGORY,
                        related: &[concat!("to_", $abbrev)],
                    }
                }

                fn call(&self, args: &[Value]) -> Value {
                    call_scaled(concat!("from_", $abbrev), $full, args,
                        |n| DataSizeUnit::$unit.scale().to_canonical(n))
                }
            }

            pub struct $to;

            impl FunctionPlugin for $to {
                fn meta(&self) -> FunctionMeta {
                    const ARGS: &[ArgMeta] = &[
                        ArgMeta::required("bytes", "Number", "Data size in bytes", "Data size in **bytes**"),
                    ];
                    FunctionMeta {
                        name: concat!("to_", $abbrev),
                        summary: concat!("Converts bytes to ", $full),
                        description: concat!("Given data size in bytes, converts it to ", $full, "."),
                        markdown_description: concat!("Given data size in **bytes**, converts it to **", $full, "**."),
                        usage: concat!("to_", $abbrev, "(bytes)"),
                        args: ARGS,
                        returns: "Number",
                        examples: &[concat!("to_", $abbrev, "(", $bytes, ") → 1")],
                        category: CATEGORY,
                        related: &[concat!("from_", $abbrev)],
                    }
                }

                fn call(&self, args: &[Value]) -> Value {
                    call_scaled(concat!("to_", $abbrev), "bytes", args,
                        |n| DataSizeUnit::$unit.scale().from_canonical(n))
                }
            }
        )*

        /// Register both directions for every non-canonical unit
        pub fn register(registry: PluginRegistry) -> PluginRegistry {
            registry
                $( .with_function($from).with_function($to) )*
        }
    };
}

data_size_functions! {
    Kibibytes => FromKibibytes, ToKibibytes, "kibibytes", "kib", "1024";
    Mebibytes => FromMebibytes, ToMebibytes, "mebibytes", "mib", "1048576";
    Gibibytes => FromGibibytes, ToGibibytes, "gibibytes", "gib", "1073741824";
    Tebibytes => FromTebibytes, ToTebibytes, "tebibytes", "tib", "1099511627776";
    Pebibytes => FromPebibytes, ToPebibytes, "pebibytes", "pib", "1125899906842624";
    Kilobytes => FromKilobytes, ToKilobytes, "kilobytes", "kb", "1000";
    Megabytes => FromMegabytes, ToMegabytes, "megabytes", "mb", "1000000";
    Gigabytes => FromGigabytes, ToGigabytes, "gigabytes", "gb", "1000000000";
    Terabytes => FromTerabytes, ToTerabytes, "terabytes", "tb", "1000000000000";
    Petabytes => FromPetabytes, ToPetabytes, "petabytes", "pb", "1000000000000000";
}
