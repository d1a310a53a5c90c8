#![no_main]

use dmiscope::{smbios::project, Info};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(info) = Info::from_dump(data) {
        for table in info.tables() {
            if let Ok(typed) = project(table) {
                let _ = typed.encode();
            }
        }
        let _ = info.encode_tables();
    }
});
