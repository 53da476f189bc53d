//! Small tour of `ChainedHashMap`: mixed int and string keys, lookups,
//! re-ordering by key and by value, and removal.
//!
//! Run with `cargo run --example hashmap_names`.

use ds_collections::ChainedHashMap;
use std::fmt;

const NAMES: [&str; 22] = [
    "andrew", "bob", "sally", "billy", "kaitlyn", "springsteen", "cauchy", "plato", "darlene",
    "jenny", "lauren", "barry", "brennan", "smalls", "dobes", "pipes", "sarah", "kayla", "jack",
    "bruce", "lorelei", "mickey",
];

fn print_keyvals(map: &ChainedHashMap<&str, &str>) -> fmt::Result {
    let mut out = String::new();
    map.write_keyvals(&mut out, |name| *name)?;
    println!("\nKEYS--------\n{out}");
    Ok(())
}

fn main() -> fmt::Result {
    // Keys and values are borrowed, so the map owns neither.
    let mut hash: ChainedHashMap<&str, &str> = ChainedHashMap::new();

    hash.put_int(8213, NAMES[10]);
    hash.put_str("snot", NAMES[0]);
    hash.put_int(921, NAMES[5]);
    hash.put_str("booger", NAMES[1]);
    hash.put_int(1234, NAMES[20]);

    for name in [hash.get_str("snot"), hash.get_str("booger"), hash.get_int(1234)]
        .into_iter()
        .flatten()
    {
        println!("{name}");
    }

    print_keyvals(&hash)?;

    hash.sort_keys();
    print_keyvals(&hash)?;

    hash.sort_by(|(_, a), (_, b)| a.cmp(b));
    print_keyvals(&hash)?;

    hash.remove_str("booger");
    hash.remove_int(12344);
    print_keyvals(&hash)
}
