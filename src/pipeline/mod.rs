pub mod extract;
pub mod normalize;
pub mod ocr;
pub mod processor;

pub use processor::ReportPipeline;
