//! SignalRank Core — domain types, asset resolution, providers, indicators, scoring.
//!
//! This crate contains the heart of the prediction-reliability engine:
//! - Domain types (predictions, bars, snapshots, score breakdowns)
//! - Asset resolver with canonical registry and alias normalization
//! - Provider traits (market data, fundamentals, order-book depth)
//! - Indicator kernels (RSI, MACD, SMA/EMA, ATR, ADX, Bollinger, Donchian, ROC, VWAP)
//! - Scoring engines: technical bias, momentum alignment, structural and
//!   confidence reliability, bootstrap-based entry quality, final score
//! - Deterministic per-prediction RNG derivation

pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod rng;
pub mod scoring;
