// Copyright (c) 2016 rust-threshold-secret-sharing developers

#[macro_use]
extern crate bencher;
extern crate gf2w_secret_sharing as sss;

use bencher::Bencher;
use sss::{combine, Context, RngChoice};

fn share_w8_n10_t6(b: &mut Bencher) {
    let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
    b.iter(|| ctx.share("deadbeefcafef00d", 10, 6, None).unwrap());
}

fn share_w16_n40_t20(b: &mut Bencher) {
    let mut ctx = Context::new(Some(16), Some(RngChoice::DeterministicTest)).unwrap();
    b.iter(|| ctx.share("deadbeefcafef00d", 40, 20, None).unwrap());
}

fn combine_w8_t6(b: &mut Bencher) {
    let mut ctx = Context::new(Some(8), Some(RngChoice::DeterministicTest)).unwrap();
    let shares = ctx.share("deadbeefcafef00d", 10, 6, None).unwrap();
    let refs: Vec<&str> = shares[..6].iter().map(String::as_str).collect();
    b.iter(|| combine(&refs, 0).unwrap());
}

fn combine_w16_t20(b: &mut Bencher) {
    let mut ctx = Context::new(Some(16), Some(RngChoice::DeterministicTest)).unwrap();
    let shares = ctx.share("deadbeefcafef00d", 40, 20, None).unwrap();
    let refs: Vec<&str> = shares[..20].iter().map(String::as_str).collect();
    b.iter(|| combine(&refs, 0).unwrap());
}

benchmark_group!(share, share_w8_n10_t6, share_w16_n40_t20);
benchmark_group!(combine_group, combine_w8_t6, combine_w16_t20);
benchmark_main!(share, combine_group);
