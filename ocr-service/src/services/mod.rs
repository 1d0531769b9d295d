pub mod metrics;
pub mod nutrition_parser;
pub mod providers;

pub use metrics::{get_metrics, init_metrics};
pub use nutrition_parser::parse_nutrition_text;
pub use providers::{
    assemble_text, ClovaConfig, ClovaOcrProvider, FieldRecognizer, MockFieldRecognizer,
    MockTextRecognizer, OcrError, OcrField, TesseractConfig, TesseractProvider, TextRecognizer,
    UploadedImage,
};
