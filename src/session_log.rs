//! JSON-lines session log.
//!
//! One record per processed action, plus a final record when the board
//! stops on a fault. A write error disables the log; the game keeps going.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::core::{BoardSnapshot, ConsistencyFault, Coord};
use crate::types::{GameAction, FOUNDATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    #[serde(rename = "action")]
    Action,
    #[serde(rename = "fault")]
    Fault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorRecord {
    pub column: u8,
    pub row: u8,
}

impl From<Coord> for CursorRecord {
    fn from(coord: Coord) -> Self {
        Self {
            column: coord.column,
            row: coord.row,
        }
    }
}

/// One line of the log. Cards are written as their hash (`suit * 13 + rank - 1`).
#[derive(Debug, Clone, Serialize)]
pub struct SessionRecord<'a> {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub seq: u64,
    pub ts_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<&'a str>,
    pub changed: bool,
    pub cursor: CursorRecord,
    pub mode: &'a str,
    pub held: u8,
    /// Packed candidate while targeting, see `Target::unpack`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<u8>,
    pub waste_top: Option<u8>,
    pub foundations: [Option<u8>; FOUNDATIONS],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<&'a str>,
}

impl<'a> SessionRecord<'a> {
    fn from_snapshot(record_type: RecordType, seq: u64, ts_ms: u64, snap: &BoardSnapshot) -> Self {
        Self {
            record_type,
            seq,
            ts_ms,
            action: None,
            changed: false,
            cursor: snap.cursor.into(),
            mode: if snap.targeting { "targeting" } else { "browsing" },
            held: snap.held_len,
            target: snap.target,
            waste_top: snap.waste_top.map(|c| c.to_hash()),
            foundations: snap.foundations.map(|f| f.map(|c| c.to_hash())),
            fault: None,
        }
    }
}

pub struct SessionLog<W: Write> {
    out: Option<W>,
    buf: Vec<u8>,
    seq: u64,
    started: Instant,
}

impl SessionLog<File> {
    /// Append to `path`, creating it if needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> SessionLog<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Some(out),
            buf: Vec::with_capacity(256),
            seq: 0,
            started: Instant::now(),
        }
    }

    /// A log that writes nothing.
    pub fn disabled() -> Self {
        Self {
            out: None,
            buf: Vec::new(),
            seq: 0,
            started: Instant::now(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.out.is_some()
    }

    /// Records written so far.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn record_action(&mut self, action: GameAction, changed: bool, snap: &BoardSnapshot) {
        if self.out.is_none() {
            return;
        }
        let mut record = SessionRecord::from_snapshot(RecordType::Action, self.seq, self.ts_ms(), snap);
        record.action = Some(action.as_str());
        record.changed = changed;
        self.write(&record);
    }

    pub fn record_fault(&mut self, fault: &ConsistencyFault, snap: &BoardSnapshot) {
        if self.out.is_none() {
            return;
        }
        let mut record = SessionRecord::from_snapshot(RecordType::Fault, self.seq, self.ts_ms(), snap);
        record.fault = Some(fault.as_str());
        self.write(&record);
    }

    pub fn into_inner(self) -> Option<W> {
        self.out
    }

    fn ts_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn write(&mut self, record: &SessionRecord<'_>) {
        let Some(out) = self.out.as_mut() else {
            return;
        };
        self.buf.clear();
        if serde_json::to_writer(&mut self.buf, record).is_err() {
            return;
        }
        self.buf.push(b'\n');
        if out.write_all(&self.buf).and_then(|_| out.flush()).is_err() {
            self.out = None;
            return;
        }
        self.seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{BoardState, Target};
    use crate::types::{CardId, DECK_SIZE};

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_action_records_are_json_lines() {
        let mut board = BoardState::new(3);
        let mut log = SessionLog::new(Vec::new());

        let changed = board.apply_action(GameAction::Left).unwrap();
        log.record_action(GameAction::Left, changed, &board.snapshot());
        let changed = board.apply_action(GameAction::Primary).unwrap();
        log.record_action(GameAction::Primary, changed, &board.snapshot());
        assert_eq!(log.seq(), 2);

        let bytes = log.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "action");
        assert_eq!(first["seq"], 0);
        assert_eq!(first["action"], "left");
        assert_eq!(first["changed"], true);
        assert_eq!(first["cursor"]["column"], 0);
        assert_eq!(first["cursor"]["row"], 0);
        assert_eq!(first["mode"], "browsing");
        assert!(first["waste_top"].is_null());
        assert!(first.get("fault").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["seq"], 1);
        assert!(second["waste_top"].is_u64());
        assert_eq!(second["foundations"].as_array().unwrap().len(), FOUNDATIONS);
    }

    #[test]
    fn test_targeting_records_read_back() {
        let mut board = BoardState::new(1);
        let order: [CardId; DECK_SIZE] =
            std::array::from_fn(|i| CardId::from_hash(i as u8).unwrap());
        board.deal_from(&order).unwrap();
        let mut log = SessionLog::new(Vec::new());

        // Lift the ace of hearts, then step from its column to the two of spades.
        for action in [
            GameAction::Left,
            GameAction::Down,
            GameAction::Primary,
            GameAction::Right,
        ] {
            let changed = board.apply_action(action).unwrap();
            log.record_action(action, changed, &board.snapshot());
        }

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].get("target").is_none());

        let picked = &lines[2];
        assert_eq!(picked["mode"], "targeting");
        let packed = picked["target"].as_u64().unwrap() as u8;
        assert_eq!(Target::unpack(packed), Some(Target::Tableau(0)));

        let stepped = &lines[3];
        let packed = stepped["target"].as_u64().unwrap() as u8;
        assert_eq!(Target::unpack(packed), Some(Target::Tableau(4)));

        let kind: RecordType = serde_json::from_value(stepped["type"].clone()).unwrap();
        assert_eq!(kind, RecordType::Action);
        let cursor: CursorRecord = serde_json::from_value(stepped["cursor"].clone()).unwrap();
        assert_eq!(cursor, CursorRecord::from(board.cursor()));
    }

    #[test]
    fn test_fault_record_names_the_fault() {
        let board = BoardState::new(3);
        let mut log = SessionLog::new(Vec::new());
        log.record_fault(&ConsistencyFault::NoLegalTargets, &board.snapshot());

        let text = String::from_utf8(log.into_inner().unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["type"], "fault");
        assert_eq!(value["fault"], ConsistencyFault::NoLegalTargets.as_str());
        assert!(value.get("action").is_none());
    }

    #[test]
    fn test_write_failure_disables_log() {
        let board = BoardState::new(3);
        let mut log = SessionLog::new(FailingWriter);
        assert!(log.is_enabled());
        log.record_action(GameAction::Up, false, &board.snapshot());
        assert!(!log.is_enabled());
        assert_eq!(log.seq(), 0);

        // Further records are dropped quietly.
        log.record_action(GameAction::Up, false, &board.snapshot());
        assert_eq!(log.seq(), 0);
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let board = BoardState::new(3);
        let mut log: SessionLog<Vec<u8>> = SessionLog::disabled();
        log.record_action(GameAction::Down, true, &board.snapshot());
        assert!(log.into_inner().is_none());
    }
}
