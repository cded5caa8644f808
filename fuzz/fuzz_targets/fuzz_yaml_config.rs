#![no_main]

use figment::Figment;
use figment::providers::{Format, Yaml};
use libfuzzer_sys::fuzz_target;
use visitorgen::{Generator, GeneratorConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that extracts must either validate or be rejected cleanly
        if let Ok(config) = Figment::from(Yaml::string(s)).extract::<GeneratorConfig>() {
            let _ = Generator::new(config);
        }
    }
});
