//! Transaction parameter resolution for swap execution

mod options;

pub use options::{
    parse_address, parse_amount, parse_gas_limit, resolve_sender, resolve_value,
    validate_execution_options, ValidatedOptions,
};
