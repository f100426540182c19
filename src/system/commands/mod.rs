//! Built-in command table.

use super::router::Command;
use super::{notepad, script};

pub mod device;
pub mod files;
pub mod info;

/// `device` subcommands.
pub static DEVICE_COMMANDS: [Command; 5] = [
    Command::leaf(
        "register",
        "device register <name> <pin> <in|out|adc|pwm> [up|down]",
        device::register,
    ),
    Command::leaf("control", "device control <name> <value>", device::control),
    Command::leaf("read", "device read <name>", device::read),
    Command::leaf("list", "device list", device::list),
    Command::leaf("freq", "device freq <name> <hz>", device::freq),
];

/// Top-level commands.
pub static COMMANDS: [Command; 18] = [
    Command::leaf("ls", "ls [dir]", files::list),
    Command::leaf("cd", "cd <dir>", files::change_dir),
    Command::leaf("pwd", "pwd", files::print_dir),
    Command::leaf("delete", "delete <file>", files::delete),
    Command::leaf("del", "del <file>", files::delete),
    Command::leaf("mkdir", "mkdir <dir>", files::make_dir),
    Command::leaf("rmdir", "rmdir <dir>", files::remove_dir),
    Command::leaf("notepad", "notepad [file]", notepad::notepad),
    Command::leaf("cp", "cp <src> <dst>", files::copy),
    Command::leaf("mv", "mv <src> <dst>", files::rename),
    Command::leaf("run", "run <script> [--dry-run]", script::run),
    Command::leaf("cat", "cat <file>", files::cat),
    Command::leaf("memory", "memory", info::memory),
    Command::leaf("reboot", "reboot", info::reboot),
    Command::leaf("temp", "temp", info::temperature),
    Command::leaf("about", "about", info::about),
    Command::leaf("help", "help [command]", info::help),
    Command::group("device", "device <register|control|read|list|freq> ...", &DEVICE_COMMANDS),
];
