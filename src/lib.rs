//! Office Installer Library
//!
//! Picks an installer configuration file from a folder and runs
//! `setup.exe /configure <file>` without blocking the window.

pub mod activity;
pub mod catalog;
pub mod config;
pub mod gui;
pub mod launcher;
