//! Property tests: the loader must be total over arbitrary input.

use proptest::prelude::*;
use syslang_model::{parse_model, write_model};

proptest! {
    #[test]
    fn loader_never_panics(source in "\\PC*") {
        let _ = parse_model(&source);
    }

    #[test]
    fn loader_never_panics_on_yamlish_input(
        key in "[a-z_]{1,12}",
        value in "[a-zA-Z0-9_ .:\\-\\[\\]{}]{0,40}",
    ) {
        let _ = parse_model(&format!("system:\n  name: T\n{key}: {value}"));
    }

    #[test]
    fn parsed_models_always_write(
        name in "[a-zA-Z][a-zA-Z0-9 ]{0,20}",
        domain in "[a-z]{1,12}",
        confidence in 0.0f64..=1.0,
    ) {
        let source = format!(
            "system: {{name: {name}, domain: {domain}}}\n\
             principles: [{{name: emergence, confidence: {confidence}}}]"
        );
        if let Ok(model) = parse_model(&source) {
            let rendered = write_model(&model).unwrap();
            prop_assert!(parse_model(&rendered).is_ok());
        }
    }
}
