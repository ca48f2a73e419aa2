#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shortcut_store::{parse, upsert_icon};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    store: &'a [u8],
    position: u8,
    icon: String,
}

fuzz_target!(|input: Input| {
    let Ok(updated) = upsert_icon(input.store, input.position as usize, &input.icon) else {
        return;
    };

    // A successful edit always reparses with the new icon in place
    let entries = parse(&updated).expect("edited store reparses");
    assert_eq!(
        entries[input.position as usize].icon_path.as_deref(),
        Some(input.icon.as_str())
    );
});
