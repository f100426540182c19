//! Run the shell against a host directory.
//!
//! ```text
//! angusto-sim [ROOT]
//! ```
//!
//! `ROOT` (default: the current directory) plays the board's filesystem.
//! End the session with Ctrl-D.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use angusto::boot::{self, BootConfig};
use angusto::config::{BoardConfig, PICO};
use angusto::device::DeviceManager;
use angusto::sim::{HostFs, SharedIndicator, SimBoard, SimPlatform, StdConsole, StdDelay};
use angusto::system::{IdleBlink, Shell, ShellContext};

fn spawn_idle_blink(led: SharedIndicator, board: BoardConfig) {
    thread::spawn(move || {
        let started = Instant::now();
        let mut idle = IdleBlink::new(&board, 0);
        let mut led = led;
        let mut delay = StdDelay;
        loop {
            thread::sleep(Duration::from_millis(50));
            if idle.poll(started.elapsed().as_millis() as u64) {
                idle.pulse(&mut led, &mut delay);
            }
        }
    });
}

fn main() -> ExitCode {
    let root = env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if !root.is_dir() {
        eprintln!("angusto-sim: {} is not a directory", root.display());
        return ExitCode::FAILURE;
    }

    let mut console = StdConsole;
    let mut fs = HostFs::new(root);
    let config = BootConfig::load(&mut fs, &mut console);
    let board = config.apply(PICO);

    let mut devices = DeviceManager::new(SimBoard::default(), board);
    let mut platform = SimPlatform::default();
    let mut led = SharedIndicator::default();
    let mut delay = StdDelay;
    spawn_idle_blink(led.clone(), board);

    let ctx = ShellContext::new(
        &mut console,
        &mut fs,
        &mut devices,
        &mut platform,
        &mut led,
        &mut delay,
    )
    .with_board(board);
    let mut shell = Shell::new(ctx);
    shell.set_echo(false);

    boot::run(shell.context(), &config);
    shell.welcome();
    shell.run();
    ExitCode::SUCCESS
}
