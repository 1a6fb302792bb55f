/*
 * Copyright (c) 2019. The information/code/data contained within this file and all other files with the same copyright are protected under US Statutes. You must have explicit written access by Thomas P. Braun in order to access, view, modify, alter, or apply this code in any context commercial or non-commercial. If you have this code but were not given explicit written access by Thomas P. Braun, you must destroy the information herein for legal safety. You agree that if you apply the concepts herein without any written access, Thomas P. Braun will seek the maximum possible legal retribution.
 */

#[macro_use]
extern crate criterion;

use bytes::{BufMut, BytesMut};
use criterion::{black_box, BenchmarkId, Criterion};

use fibervec::prelude::*;

fn vec(len: usize) {
    let mut mem = Vec::new();
    for idx in 0..len {
        mem.push(idx);
    }
    let _ = black_box(mem);
}

fn dynamic_array(len: usize) {
    let mut mem = DynamicArray::with_init().unwrap();
    for idx in 0..len {
        mem.push(idx).unwrap();
    }
    let _ = black_box(mem);
}

fn byte_array(len: usize) {
    let mut mem = DynamicArray::<u8>::with_init().unwrap();
    for idx in 0..len {
        mem.put_u8(idx as u8);
    }
    let _ = black_box(mem);
}

fn bytes_mut(len: usize) {
    let mut mem = BytesMut::new();
    for idx in 0..len {
        mem.put_u8(idx as u8);
    }
    let _ = black_box(mem);
}

///Main function
fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Push benches");
    for len in [120usize, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("std vec", len), len, |b, i| b.iter(|| vec(*i)));
        group.bench_with_input(BenchmarkId::new("DynamicArray", len), len, |b, i| b.iter(|| dynamic_array(*i)));
    }
    group.finish();

    let mut group = c.benchmark_group("Byte sink benches");
    for len in [120usize, 4096].iter() {
        group.bench_with_input(BenchmarkId::new("DynamicArray<u8>", len), len, |b, i| b.iter(|| byte_array(*i)));
        group.bench_with_input(BenchmarkId::new("BytesMut", len), len, |b, i| b.iter(|| bytes_mut(*i)));
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
