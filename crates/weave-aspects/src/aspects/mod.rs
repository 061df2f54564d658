pub mod count;
pub mod override_result;
pub mod range_guard;
pub mod short_circuit;
pub mod trace;
