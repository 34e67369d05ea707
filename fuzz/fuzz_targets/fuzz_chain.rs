//! Fuzz testing for slice-chain framing.
//!
//! Splits arbitrary bytes into arbitrary segments and decodes a row of
//! `slice_count` slices from an arbitrary window of the chain.

#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use rowcodec::{decode_chain, IoBuf};

#[derive(Debug, Arbitrary)]
struct ChainInput {
    segments: Vec<Vec<u8>>,
    offset: u16,
    size: u16,
    slice_count: u8,
}

fuzz_target!(|input: ChainInput| {
    let chain: IoBuf = input.segments.into_iter().map(Bytes::from).collect();
    let _ = decode_chain(
        &chain,
        usize::from(input.offset),
        usize::from(input.size),
        usize::from(input.slice_count),
    );
});
