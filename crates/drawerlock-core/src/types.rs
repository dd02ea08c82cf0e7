use crate::{
    Result,
    constants::{CODE_LENGTH, MASK_EMPTY, MASK_ENTERED},
    error::Error,
};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Direction symbol produced by the analog stick.
///
/// The four directions form the whole alphabet of a gesture code. Each one
/// has a single-letter symbol used in configuration and log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Direction {
    Up = b'U',
    Down = b'D',
    Left = b'L',
    Right = b'R',
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a direction from its single-letter symbol (case-insensitive).
    ///
    /// # Errors
    /// Returns `Error::InvalidDirection` for anything other than `U`, `D`, `L` or `R`.
    pub fn from_symbol(symbol: char) -> Result<Self> {
        match symbol.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            _ => Err(Error::InvalidDirection(symbol)),
        }
    }

    #[inline]
    #[must_use]
    pub fn symbol(self) -> char {
        self as u8 as char
    }

    #[inline]
    #[must_use]
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Direction {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self> {
        Direction::from_symbol(symbol)
    }
}

/// The secret gesture code that unlocks the drawer.
///
/// Always exactly [`CODE_LENGTH`] symbols. Serialized as its symbol string
/// (`"UUDDLR"`).
///
/// # Security
/// Matching runs in constant time so a partial match cannot be observed
/// through timing. `Debug` output is masked.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretCode([Direction; CODE_LENGTH]);

impl SecretCode {
    #[must_use]
    pub fn new(symbols: [Direction; CODE_LENGTH]) -> Self {
        SecretCode(symbols)
    }

    /// Parse a secret from its symbol string.
    ///
    /// Surrounding whitespace is ignored and lowercase letters are accepted.
    ///
    /// # Errors
    /// Returns `Error::InvalidSecret` if the string does not hold exactly
    /// [`CODE_LENGTH`] valid direction symbols.
    pub fn parse(code: &str) -> Result<Self> {
        let code = code.trim();
        let count = code.chars().count();
        if count != CODE_LENGTH {
            return Err(Error::InvalidSecret {
                reason: format!("expected {CODE_LENGTH} symbols, got {count}"),
            });
        }

        let mut symbols = [Direction::Up; CODE_LENGTH];
        for (slot, ch) in symbols.iter_mut().zip(code.chars()) {
            *slot = Direction::from_symbol(ch).map_err(|_| Error::InvalidSecret {
                reason: format!("'{ch}' is not one of U, D, L, R"),
            })?;
        }
        Ok(SecretCode(symbols))
    }

    #[must_use]
    pub fn symbols(&self) -> &[Direction; CODE_LENGTH] {
        &self.0
    }

    /// Compare an entered code against the secret.
    ///
    /// Only a full-length buffer with every symbol in the same position can
    /// match.
    #[must_use]
    pub fn matches(&self, entered: &CodeBuffer) -> bool {
        let expected = self.0.map(Direction::as_byte);
        let actual: Vec<u8> = entered.iter().map(Direction::as_byte).collect();
        expected.as_slice().ct_eq(actual.as_slice()).into()
    }

    fn to_symbol_string(self) -> String {
        self.0.iter().map(|d| d.symbol()).collect()
    }
}

/// The factory code, [`DEFAULT_SECRET`](crate::constants::DEFAULT_SECRET).
impl Default for SecretCode {
    fn default() -> Self {
        SecretCode([
            Direction::Up,
            Direction::Up,
            Direction::Down,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ])
    }
}

impl fmt::Debug for SecretCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SecretCode({})", MASK_ENTERED.to_string().repeat(CODE_LENGTH))
    }
}

impl std::str::FromStr for SecretCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SecretCode::parse(s)
    }
}

impl TryFrom<String> for SecretCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        SecretCode::parse(&value)
    }
}

impl From<SecretCode> for String {
    fn from(code: SecretCode) -> Self {
        code.to_symbol_string()
    }
}

/// Ordered buffer of entered direction symbols, capped at [`CODE_LENGTH`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBuffer {
    symbols: [Option<Direction>; CODE_LENGTH],
    len: usize,
}

impl CodeBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol.
    ///
    /// Returns `false` and leaves the buffer untouched when it is already full.
    #[must_use = "a full buffer rejects the symbol"]
    pub fn push(&mut self, direction: Direction) -> bool {
        if self.is_full() {
            return false;
        }
        self.symbols[self.len] = Some(direction);
        self.len += 1;
        true
    }

    pub fn clear(&mut self) {
        self.symbols = [None; CODE_LENGTH];
        self.len = 0;
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == CODE_LENGTH
    }

    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.symbols[..self.len].iter().flatten().copied()
    }

    /// Masked progress indicator, e.g. `***___`.
    #[must_use]
    pub fn masked(&self) -> String {
        let mut out = String::with_capacity(CODE_LENGTH);
        out.extend(std::iter::repeat_n(MASK_ENTERED, self.len));
        out.extend(std::iter::repeat_n(MASK_EMPTY, CODE_LENGTH - self.len));
        out
    }
}

/// Symbols as entered, e.g. `UUDDLL`.
impl fmt::Display for CodeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for direction in self.iter() {
            write!(f, "{direction}")?;
        }
        Ok(())
    }
}

impl FromIterator<Direction> for CodeBuffer {
    /// Collect directions into a buffer, dropping anything past [`CODE_LENGTH`].
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> Self {
        let mut buffer = CodeBuffer::new();
        for direction in iter {
            if !buffer.push(direction) {
                break;
            }
        }
        buffer
    }
}

/// Wall-clock time of day reported by the optional calendar chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// # Errors
    /// Returns `Error::InvalidTime` if any component is out of range.
    pub fn new(hour: u8, minute: u8, second: u8) -> Result<Self> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::InvalidTime {
                hour,
                minute,
                second,
            });
        }
        Ok(TimeOfDay {
            hour,
            minute,
            second,
        })
    }

    /// Take the time of day from any chrono time value.
    ///
    /// Leap seconds are clamped to `59`.
    #[must_use]
    pub fn from_timelike<T: Timelike>(time: &T) -> Self {
        TimeOfDay {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
            second: time.second().min(59) as u8,
        }
    }

    #[must_use]
    pub fn hour(&self) -> u8 {
        self.hour
    }

    #[must_use]
    pub fn minute(&self) -> u8 {
        self.minute
    }

    #[must_use]
    pub fn second(&self) -> u8 {
        self.second
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Operating state of the access controller.
///
/// # Valid Transitions
///
/// - Idle → CollectingCode
/// - CollectingCode → Verifying | Idle
/// - Verifying → Unlocked | CollectingCode | AlarmLockout
/// - Unlocked → Idle
/// - AlarmLockout → Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemState {
    /// Drawer locked, waiting for someone to approach.
    #[default]
    Idle,

    /// Presence detected, gesture code being entered.
    CollectingCode,

    /// Complete code submitted, comparison pending.
    Verifying,

    /// Correct code entered, drawer unlocked until auto-relock.
    Unlocked,

    /// Too many failed attempts, all input ignored until the lockout clears.
    AlarmLockout,
}

impl SystemState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use drawerlock_core::SystemState;
    ///
    /// assert!(SystemState::Idle.can_transition_to(&SystemState::CollectingCode));
    /// assert!(!SystemState::Idle.can_transition_to(&SystemState::Unlocked));
    /// ```
    #[must_use]
    pub fn can_transition_to(&self, target: &SystemState) -> bool {
        matches!(
            (self, target),
            (SystemState::Idle, SystemState::CollectingCode)
                | (
                    SystemState::CollectingCode,
                    SystemState::Verifying | SystemState::Idle
                )
                | (
                    SystemState::Verifying,
                    SystemState::Unlocked | SystemState::CollectingCode | SystemState::AlarmLockout
                )
                | (SystemState::Unlocked, SystemState::Idle)
                | (SystemState::AlarmLockout, SystemState::Idle)
        )
    }

    /// Position the lock must be commanded to while in this state.
    #[must_use]
    pub fn lock_engaged(&self) -> bool {
        !matches!(self, SystemState::Unlocked)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let state_str = match self {
            SystemState::Idle => "Idle",
            SystemState::CollectingCode => "CollectingCode",
            SystemState::Verifying => "Verifying",
            SystemState::Unlocked => "Unlocked",
            SystemState::AlarmLockout => "AlarmLockout",
        };
        write!(f, "{}", state_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn buffer(code: &str) -> CodeBuffer {
        code.chars().map(|c| Direction::from_symbol(c).unwrap()).collect()
    }

    #[rstest]
    #[case('U', Direction::Up)]
    #[case('d', Direction::Down)]
    #[case('L', Direction::Left)]
    #[case('r', Direction::Right)]
    fn test_direction_from_symbol(#[case] symbol: char, #[case] expected: Direction) {
        assert_eq!(Direction::from_symbol(symbol).unwrap(), expected);
        assert_eq!(expected.symbol(), symbol.to_ascii_uppercase());
    }

    #[rstest]
    #[case('X')]
    #[case('1')]
    #[case(' ')]
    fn test_direction_invalid(#[case] symbol: char) {
        assert!(matches!(
            Direction::from_symbol(symbol),
            Err(Error::InvalidDirection(c)) if c == symbol
        ));
    }

    #[rstest]
    #[case("UUDDLR")]
    #[case("uuddlr")]
    #[case("  LRLRUD ")]
    fn test_secret_parse_valid(#[case] input: &str) {
        let secret: SecretCode = input.parse().unwrap();
        let round: String = secret.into();
        assert_eq!(round, input.trim().to_ascii_uppercase());
    }

    #[rstest]
    #[case("")]
    #[case("UUDDL")] // too short
    #[case("UUDDLRR")] // too long
    #[case("UUDDLX")] // bad symbol
    fn test_secret_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            SecretCode::parse(input),
            Err(Error::InvalidSecret { .. })
        ));
    }

    #[test]
    fn test_default_secret_matches_constant() {
        let parsed = SecretCode::parse(crate::constants::DEFAULT_SECRET).unwrap();
        assert_eq!(SecretCode::default(), parsed);
    }

    #[test]
    fn test_secret_debug_is_masked() {
        let secret = SecretCode::parse("UUDDLR").unwrap();
        let debug = format!("{secret:?}");
        assert!(!debug.contains("UUDDLR"));
        assert_eq!(debug, "SecretCode(******)");
    }

    #[test]
    fn test_secret_serde_as_string() {
        let secret = SecretCode::parse("LRLRUD").unwrap();
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, "\"LRLRUD\"");

        let back: SecretCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, secret);

        assert!(serde_json::from_str::<SecretCode>("\"UUD\"").is_err());
    }

    #[rstest]
    #[case("UUDDLR", true)]
    #[case("UUDDLL", false)]
    #[case("RLDDUU", false)]
    #[case("UUDDL", false)] // incomplete
    #[case("", false)]
    fn test_secret_matches(#[case] entered: &str, #[case] expected: bool) {
        let secret = SecretCode::parse("UUDDLR").unwrap();
        assert_eq!(secret.matches(&buffer(entered)), expected);
    }

    #[test]
    fn test_code_buffer_rejects_when_full() {
        let mut buf = buffer("UUDDLR");
        assert!(buf.is_full());
        assert!(!buf.push(Direction::Left));
        assert_eq!(buf.len(), CODE_LENGTH);
        assert_eq!(buf.to_string(), "UUDDLR");
    }

    #[rstest]
    #[case("", "______")]
    #[case("U", "*_____")]
    #[case("UUD", "***___")]
    #[case("UUDDLR", "******")]
    fn test_code_buffer_masked(#[case] entered: &str, #[case] expected: &str) {
        assert_eq!(buffer(entered).masked(), expected);
    }

    #[test]
    fn test_code_buffer_clear() {
        let mut buf = buffer("UUD");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf, CodeBuffer::new());
        assert_eq!(buf.masked(), "______");
    }

    #[test]
    fn test_time_of_day_format() {
        let time = TimeOfDay::new(7, 5, 9).unwrap();
        assert_eq!(time.to_string(), "07:05:09");
    }

    #[rstest]
    #[case(24, 0, 0)]
    #[case(0, 60, 0)]
    #[case(0, 0, 60)]
    fn test_time_of_day_invalid(#[case] h: u8, #[case] m: u8, #[case] s: u8) {
        assert!(TimeOfDay::new(h, m, s).is_err());
    }

    #[test]
    fn test_time_of_day_from_chrono() {
        let time = chrono::NaiveTime::from_hms_opt(23, 59, 58).unwrap();
        assert_eq!(TimeOfDay::from_timelike(&time).to_string(), "23:59:58");
    }

    #[rstest]
    #[case(SystemState::Idle, SystemState::CollectingCode, true)]
    #[case(SystemState::CollectingCode, SystemState::Verifying, true)]
    #[case(SystemState::CollectingCode, SystemState::Idle, true)]
    #[case(SystemState::Verifying, SystemState::Unlocked, true)]
    #[case(SystemState::Verifying, SystemState::CollectingCode, true)]
    #[case(SystemState::Verifying, SystemState::AlarmLockout, true)]
    #[case(SystemState::Unlocked, SystemState::Idle, true)]
    #[case(SystemState::AlarmLockout, SystemState::Idle, true)]
    #[case(SystemState::Idle, SystemState::Unlocked, false)]
    #[case(SystemState::CollectingCode, SystemState::Unlocked, false)]
    #[case(SystemState::AlarmLockout, SystemState::CollectingCode, false)]
    #[case(SystemState::Unlocked, SystemState::Verifying, false)]
    fn test_state_transitions(
        #[case] from: SystemState,
        #[case] to: SystemState,
        #[case] valid: bool,
    ) {
        assert_eq!(from.can_transition_to(&to), valid);
    }

    #[test]
    fn test_only_unlocked_releases_lock() {
        assert!(SystemState::Idle.lock_engaged());
        assert!(SystemState::CollectingCode.lock_engaged());
        assert!(SystemState::Verifying.lock_engaged());
        assert!(SystemState::AlarmLockout.lock_engaged());
        assert!(!SystemState::Unlocked.lock_engaged());
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        /// Verification succeeds exactly when every symbol matches in order.
        #[test]
        fn prop_matches_iff_equal(
            secret in prop::array::uniform6(any_direction()),
            entered in prop::array::uniform6(any_direction()),
        ) {
            let code = SecretCode::new(secret);
            let buf: CodeBuffer = entered.into_iter().collect();
            prop_assert_eq!(code.matches(&buf), secret == entered);
        }

        /// The secret always matches itself.
        #[test]
        fn prop_secret_matches_itself(secret in prop::array::uniform6(any_direction())) {
            let code = SecretCode::new(secret);
            let buf: CodeBuffer = secret.into_iter().collect();
            prop_assert!(code.matches(&buf));
        }
    }
}
