//! Native functions exposed to Atlas test code

pub mod test;
