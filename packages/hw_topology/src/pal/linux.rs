mod bindings;
pub(crate) use bindings::*;

mod filesystem;
pub(crate) use filesystem::*;

mod numa;
pub(crate) use numa::*;

mod numa_resolver;
pub(crate) use numa_resolver::*;

mod platform;
pub(crate) use platform::*;
