/// Chart layer: declarative plot specs, parameter batching, and the external
/// renderer boundary.
///
/// Nothing in here draws. `batch` partitions the parameter list and builds
/// [`spec::PlotSpec`] values; `render` hands a spec to an external gnuplot
/// process. Keeping the spec declarative keeps the derivation logic testable
/// without a renderer installed.

pub mod batch;
pub mod render;
pub mod spec;
