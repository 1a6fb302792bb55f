/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */

use fibervec::prelude::*;

fn main() -> Result<(), MemError> {
    env_logger::init();

    let mut test_vec = DynamicArray::<i32>::new();
    test_vec.init()?;
    println!("length: {}", test_vec.len());

    test_vec.push(42)?;
    println!("length: {}", test_vec.len());

    for i in 0..test_vec.len() {
        println!("found {}", test_vec.value(i));
    }

    test_vec.free();
    println!("length: {}", test_vec.len());
    Ok(())
}
