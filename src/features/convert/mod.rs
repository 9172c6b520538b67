pub mod digest;
pub mod dimensions;
pub mod handler;
pub mod renderer;
pub mod service;
pub mod source;
pub mod types;

// Re-exports for external use (main.rs, OpenAPI, tests)
pub use handler::create_convert_router;
pub use renderer::{Background, ResvgRenderer, VectorRenderer, renderer_runtime_initialized};
pub use source::SvgSource;
pub use types::{BatchConvertItem, ConversionRequest, RawConversionRequest, SizePreset};
