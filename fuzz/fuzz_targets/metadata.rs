#![no_main]

use libfuzzer_sys::fuzz_target;
use kmsig::metadata::{
    read_class_data, read_function_data, read_package_data,
    signatures::{MemberSignatures, SignatureSynthesizer},
};

const STRINGS: [&str; 6] = [
    "kotlin/Int",
    "com/example/Foo",
    "Lcom/example/Foo$Bar;",
    "value",
    "",
    "kotlin/collections/List",
];

fuzz_target!(|data: &[u8]| {
    let synthesizer = SignatureSynthesizer::new();

    if let Ok(class) = read_class_data(data, &STRINGS) {
        let _ = MemberSignatures::collect(&synthesizer, &class);
    }
    if let Ok(package) = read_package_data(data, &STRINGS) {
        let _ = MemberSignatures::collect(&synthesizer, &package);
    }
    if let Ok(function) = read_function_data(data, &STRINGS) {
        let _ = MemberSignatures::collect(&synthesizer, &function);
    }
});
