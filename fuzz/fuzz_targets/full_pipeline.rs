#![no_main]
use libfuzzer_sys::fuzz_target;
use syslang_library::Library;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(model) = syslang_model::parse_model(s) {
            let library = Library::builtin();
            if syslang_check::check_model(&model, library).is_ok() {
                let report = syslang_analyze::analyze(&model, library);
                let _ = syslang_analyze::render_text(&report);
            }
        }
    }
});
