//! Mocks shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use angusto::config::PICO;
use angusto::device::DeviceManager;
use angusto::fs::{DirEntry, Error as FsError, FileKind, FileSystem, Metadata, Usage};
use angusto::hal::{
    self, AdcChannel, Board, Delay, DigitalPin, Indicator, Level, MemoryStats, Platform, Pull,
    PwmChannel,
};
use angusto::system::{Console, Shell, ShellContext};

/// Pin state behind a [`MockBoard`], shared with every handle it gives out.
#[derive(Debug, Default)]
pub struct BoardState {
    pub levels: HashMap<u8, Level>,
    pub pulls: HashMap<u8, Pull>,
    pub samples: HashMap<u8, u16>,
    pub duty: HashMap<u8, u16>,
    pub frequency: HashMap<u8, u32>,
    pub deinit: HashMap<u8, u32>,
    pub broken: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct MockBoard {
    pub state: Rc<RefCell<BoardState>>,
}

#[derive(Debug)]
pub struct MockPin {
    pin: u8,
    state: Rc<RefCell<BoardState>>,
}

#[derive(Debug)]
pub struct MockAdc {
    pin: u8,
    state: Rc<RefCell<BoardState>>,
}

#[derive(Debug)]
pub struct MockPwm {
    pin: u8,
    state: Rc<RefCell<BoardState>>,
}

fn check(state: &Rc<RefCell<BoardState>>, pin: u8) -> Result<(), hal::Error> {
    if state.borrow().broken == Some(pin) {
        return Err(hal::Error::Fault);
    }
    Ok(())
}

impl DigitalPin for MockPin {
    fn set_level(&mut self, level: Level) -> Result<(), hal::Error> {
        check(&self.state, self.pin)?;
        self.state.borrow_mut().levels.insert(self.pin, level);
        Ok(())
    }

    fn level(&self) -> Result<Level, hal::Error> {
        check(&self.state, self.pin)?;
        Ok(*self
            .state
            .borrow()
            .levels
            .get(&self.pin)
            .unwrap_or(&Level::Low))
    }
}

impl AdcChannel for MockAdc {
    fn read_u16(&mut self) -> Result<u16, hal::Error> {
        check(&self.state, self.pin)?;
        Ok(*self.state.borrow().samples.get(&self.pin).unwrap_or(&0))
    }
}

impl PwmChannel for MockPwm {
    fn set_duty_u16(&mut self, duty: u16) -> Result<(), hal::Error> {
        check(&self.state, self.pin)?;
        self.state.borrow_mut().duty.insert(self.pin, duty);
        Ok(())
    }

    fn set_frequency(&mut self, hz: u32) -> Result<(), hal::Error> {
        if hz == 0 {
            return Err(hal::Error::Frequency);
        }
        self.state.borrow_mut().frequency.insert(self.pin, hz);
        Ok(())
    }

    fn deinit(&mut self) {
        *self.state.borrow_mut().deinit.entry(self.pin).or_insert(0) += 1;
    }
}

impl MockBoard {
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.state.borrow().levels.get(&pin).copied()
    }

    pub fn pull(&self, pin: u8) -> Option<Pull> {
        self.state.borrow().pulls.get(&pin).copied()
    }

    pub fn set_sample(&self, pin: u8, raw: u16) {
        self.state.borrow_mut().samples.insert(pin, raw);
    }

    pub fn duty(&self, pin: u8) -> Option<u16> {
        self.state.borrow().duty.get(&pin).copied()
    }

    pub fn frequency(&self, pin: u8) -> Option<u32> {
        self.state.borrow().frequency.get(&pin).copied()
    }

    pub fn deinit_count(&self, pin: u8) -> u32 {
        self.state.borrow().deinit.get(&pin).copied().unwrap_or(0)
    }

    pub fn break_pin(&self, pin: u8) {
        self.state.borrow_mut().broken = Some(pin);
    }
}

impl Board for MockBoard {
    type Digital = MockPin;
    type Adc = MockAdc;
    type Pwm = MockPwm;

    fn output(&mut self, pin: u8) -> Result<MockPin, hal::Error> {
        check(&self.state, pin)?;
        Ok(MockPin {
            pin,
            state: self.state.clone(),
        })
    }

    fn input(&mut self, pin: u8, pull: Pull) -> Result<MockPin, hal::Error> {
        check(&self.state, pin)?;
        self.state.borrow_mut().pulls.insert(pin, pull);
        Ok(MockPin {
            pin,
            state: self.state.clone(),
        })
    }

    fn adc(&mut self, pin: u8) -> Result<MockAdc, hal::Error> {
        check(&self.state, pin)?;
        Ok(MockAdc {
            pin,
            state: self.state.clone(),
        })
    }

    fn pwm(&mut self, pin: u8, hz: u32) -> Result<MockPwm, hal::Error> {
        check(&self.state, pin)?;
        self.state.borrow_mut().frequency.insert(pin, hz);
        Ok(MockPwm {
            pin,
            state: self.state.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Dir,
    File(Vec<u8>),
}

/// In-memory filesystem keyed by absolute path.
#[derive(Debug)]
pub struct MemFs {
    nodes: BTreeMap<String, Node>,
    /// Every write fails with an I/O error.
    pub fail_writes: bool,
    /// Writes land with their last byte flipped.
    pub corrupt_writes: bool,
}

impl Default for MemFs {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::Dir);
        Self {
            nodes,
            fail_writes: false,
            corrupt_writes: false,
        }
    }
}

fn parent(path: &str) -> &str {
    match path.rsplit_once('/') {
        Some(("", _)) => "/",
        Some((parent, _)) => parent,
        None => "/",
    }
}

fn name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.mkdirs(path);
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.mkdirs(parent(path));
        self.nodes
            .insert(path.to_string(), Node::File(content.as_bytes().to_vec()));
        self
    }

    fn mkdirs(&mut self, path: &str) {
        if path == "/" {
            return;
        }
        self.mkdirs(parent(path));
        self.nodes.entry(path.to_string()).or_insert(Node::Dir);
    }

    pub fn file(&self, path: &str) -> Option<String> {
        match self.nodes.get(path) {
            Some(Node::File(data)) => Some(String::from_utf8_lossy(data).into_owned()),
            _ => None,
        }
    }

    pub fn is_dir(&self, path: &str) -> bool {
        self.nodes.get(path) == Some(&Node::Dir)
    }

    fn has_children(&self, dir: &str) -> bool {
        self.nodes.keys().any(|k| k != "/" && k != dir && parent(k) == dir)
    }

    fn node(&self, path: &str) -> Result<&Node, FsError> {
        self.nodes.get(path).ok_or(FsError::NotFound)
    }

    fn require_parent_dir(&self, path: &str) -> Result<(), FsError> {
        match self.nodes.get(parent(path)) {
            Some(Node::Dir) => Ok(()),
            Some(Node::File(_)) => Err(FsError::NotADirectory),
            None => Err(FsError::NotFound),
        }
    }
}

impl FileSystem for MemFs {
    fn list_dir(&mut self, path: &str, visit: &mut dyn FnMut(DirEntry<'_>)) -> Result<(), FsError> {
        if self.node(path)? != &Node::Dir {
            return Err(FsError::NotADirectory);
        }
        for (key, node) in &self.nodes {
            if key == "/" || parent(key) != path {
                continue;
            }
            let metadata = match node {
                Node::Dir => Metadata {
                    kind: FileKind::Directory,
                    size: 0,
                },
                Node::File(data) => Metadata {
                    kind: FileKind::File,
                    size: data.len() as u32,
                },
            };
            visit(DirEntry {
                name: name(key),
                metadata,
            });
        }
        Ok(())
    }

    fn metadata(&mut self, path: &str) -> Result<Metadata, FsError> {
        Ok(match self.node(path)? {
            Node::Dir => Metadata {
                kind: FileKind::Directory,
                size: 0,
            },
            Node::File(data) => Metadata {
                kind: FileKind::File,
                size: data.len() as u32,
            },
        })
    }

    fn create_dir(&mut self, path: &str) -> Result<(), FsError> {
        if self.nodes.contains_key(path) {
            return Err(FsError::AlreadyExists);
        }
        self.require_parent_dir(path)?;
        self.nodes.insert(path.to_string(), Node::Dir);
        Ok(())
    }

    fn remove_dir(&mut self, path: &str) -> Result<(), FsError> {
        match self.node(path)? {
            Node::File(_) => return Err(FsError::NotADirectory),
            Node::Dir if self.has_children(path) => return Err(FsError::NotEmpty),
            Node::Dir => {}
        }
        self.nodes.remove(path);
        Ok(())
    }

    fn remove_file(&mut self, path: &str) -> Result<(), FsError> {
        if self.node(path)? == &Node::Dir {
            return Err(FsError::IsADirectory);
        }
        self.nodes.remove(path);
        Ok(())
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), FsError> {
        self.node(from)?;
        if self.nodes.contains_key(to) {
            return Err(FsError::AlreadyExists);
        }
        self.require_parent_dir(to)?;
        let prefix = format!("{}/", from);
        let moved: Vec<String> = self
            .nodes
            .keys()
            .filter(|k| k.as_str() == from || k.starts_with(&prefix))
            .cloned()
            .collect();
        for key in moved {
            if let Some(node) = self.nodes.remove(&key) {
                let renamed = format!("{}{}", to, &key[from.len()..]);
                self.nodes.insert(renamed, node);
            }
        }
        Ok(())
    }

    fn read(&mut self, path: &str, buf: &mut [u8]) -> Result<usize, FsError> {
        match self.node(path)? {
            Node::Dir => Err(FsError::IsADirectory),
            Node::File(data) if data.len() > buf.len() => Err(FsError::TooLarge),
            Node::File(data) => {
                buf[..data.len()].copy_from_slice(data);
                Ok(data.len())
            }
        }
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        if self.fail_writes {
            return Err(FsError::Io);
        }
        if self.nodes.get(path) == Some(&Node::Dir) {
            return Err(FsError::IsADirectory);
        }
        self.require_parent_dir(path)?;
        let mut data = data.to_vec();
        if self.corrupt_writes {
            if let Some(last) = data.last_mut() {
                *last ^= 0xFF;
            }
        }
        self.nodes.insert(path.to_string(), Node::File(data));
        Ok(())
    }

    fn usage(&mut self) -> Result<Usage, FsError> {
        let files = self
            .nodes
            .values()
            .filter(|n| matches!(n, Node::File(_)))
            .count() as u32;
        Ok(Usage {
            block_size: 4096,
            total_blocks: 352,
            free_blocks: 352 - files,
        })
    }
}

/// Console fed from a script of input bytes, capturing everything printed.
#[derive(Debug, Default)]
pub struct MockConsole {
    pub input: VecDeque<u8>,
    pub output: String,
}

impl MockConsole {
    pub fn with_input(input: &str) -> Self {
        Self {
            input: input.bytes().collect(),
            output: String::new(),
        }
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output)
    }
}

impl fmt::Write for MockConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

impl Console for MockConsole {
    fn read_byte(&mut self) -> Option<u8> {
        self.input.pop_front()
    }
}

/// Records every LED transition.
#[derive(Debug, Default)]
pub struct RecordingIndicator {
    pub transitions: Vec<bool>,
}

impl RecordingIndicator {
    pub fn is_lit(&self) -> bool {
        self.transitions.last().copied().unwrap_or(false)
    }

    /// Number of times the LED was switched on.
    pub fn flashes(&self) -> usize {
        self.transitions.iter().filter(|on| **on).count()
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

impl Indicator for RecordingIndicator {
    fn set(&mut self, on: bool) {
        self.transitions.push(on);
    }
}

/// Delay that only adds up the time it was asked to wait.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub waited_ms: u64,
}

impl Delay for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.waited_ms += ms as u64;
    }
}

#[derive(Debug)]
pub struct MockPlatform {
    pub temperature_raw: Result<u16, hal::Error>,
    pub memory: MemoryStats,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            temperature_raw: Ok(14_021),
            memory: MemoryStats {
                free: 150_000,
                allocated: 50_000,
            },
        }
    }
}

impl Platform for MockPlatform {
    fn core_temperature_raw(&mut self) -> Result<u16, hal::Error> {
        self.temperature_raw
    }

    fn memory_stats(&mut self) -> MemoryStats {
        self.memory
    }

    fn reset(&mut self) -> ! {
        panic!("reset requested")
    }
}

/// Every collaborator a shell needs, owned in one place.
#[derive(Debug)]
pub struct Rig {
    pub console: MockConsole,
    pub fs: MemFs,
    pub board: MockBoard,
    pub devices: DeviceManager<MockBoard>,
    pub platform: MockPlatform,
    pub led: RecordingIndicator,
    pub delay: MockDelay,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_fs(MemFs::new())
    }

    pub fn with_fs(fs: MemFs) -> Self {
        let board = MockBoard::default();
        Self {
            console: MockConsole::default(),
            fs,
            devices: DeviceManager::new(board.clone(), PICO),
            board,
            platform: MockPlatform::default(),
            led: RecordingIndicator::default(),
            delay: MockDelay::default(),
        }
    }

    pub fn input(mut self, input: &str) -> Self {
        self.console.input = input.bytes().collect();
        self
    }

    pub fn ctx(&mut self) -> ShellContext<'_> {
        ShellContext::new(
            &mut self.console,
            &mut self.fs,
            &mut self.devices,
            &mut self.platform,
            &mut self.led,
            &mut self.delay,
        )
    }

    /// Run each line through a fresh shell, as if typed at the prompt.
    pub fn exec(&mut self, line: &str) -> String {
        let mut shell = Shell::new(self.ctx());
        shell.execute(line);
        drop(shell);
        self.console.take_output()
    }
}
