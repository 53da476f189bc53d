//! Hash map keys: integer or string, plus the hashing and default ordering
//! used by `ChainedHashMap`.

use core::cmp::Ordering;
use core::fmt;

/// An owned map key.
///
/// `S` is the string storage. With `S = &'a str` the map owns no key memory;
/// with `S = String` (the default) the string is released when its entry is
/// removed and the returned key dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key<S = String> {
    Int(i32),
    Str(S),
}

/// A borrowed key, used for lookups and comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyRef<'a> {
    Int(i32),
    Str(&'a str),
}

impl<S: AsRef<str>> Key<S> {
    #[inline]
    pub fn as_key_ref(&self) -> KeyRef<'_> {
        match self {
            Key::Int(i) => KeyRef::Int(*i),
            Key::Str(s) => KeyRef::Str(s.as_ref()),
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Key::Int(i) => Some(*i),
            Key::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::Int(_) => None,
            Key::Str(s) => Some(s.as_ref()),
        }
    }
}

impl<'a> KeyRef<'a> {
    /// Bucket index for this key in a table of `buckets` slots.
    ///
    /// Strings use djb2; integers are reduced with `rem_euclid`, so negative
    /// keys land in `[0, buckets)` as well.
    pub(crate) fn bucket(self, buckets: usize) -> usize {
        debug_assert!(buckets > 0);
        match self {
            KeyRef::Int(i) => i64::from(i).rem_euclid(buckets as i64) as usize,
            KeyRef::Str(s) => (djb2(s.as_bytes()) % buckets as u64) as usize,
        }
    }

    /// Same variant and same value: integers numerically, strings byte-for-byte.
    #[inline]
    pub(crate) fn matches<S: AsRef<str>>(self, key: &Key<S>) -> bool {
        match (self, key) {
            (KeyRef::Int(a), Key::Int(b)) => a == *b,
            (KeyRef::Str(a), Key::Str(b)) => a.as_bytes() == b.as_ref().as_bytes(),
            _ => false,
        }
    }
}

impl From<i32> for KeyRef<'static> {
    fn from(i: i32) -> Self {
        KeyRef::Int(i)
    }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(s: &'a str) -> Self {
        KeyRef::Str(s)
    }
}

impl<'a> From<&'a String> for KeyRef<'a> {
    fn from(s: &'a String) -> Self {
        KeyRef::Str(s.as_str())
    }
}

impl<'a, S: AsRef<str>> From<&'a Key<S>> for KeyRef<'a> {
    fn from(k: &'a Key<S>) -> Self {
        k.as_key_ref()
    }
}

impl<S> From<i32> for Key<S> {
    fn from(i: i32) -> Self {
        Key::Int(i)
    }
}

impl<'a> From<&'a str> for Key<&'a str> {
    fn from(s: &'a str) -> Self {
        Key::Str(s)
    }
}

impl From<String> for Key<String> {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl fmt::Display for KeyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRef::Int(i) => write!(f, "{i}"),
            KeyRef::Str(s) => f.write_str(s),
        }
    }
}

impl<S: AsRef<str>> fmt::Display for Key<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_key_ref(), f)
    }
}

/// djb2 (seed 5381, multiplier 33) over raw bytes, wrapping on overflow.
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(5381u64, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(u64::from(b))
    })
}

/// Default key ordering: compare the textual forms byte-wise.
///
/// Integer keys compare as their decimal text, so `10 < 9` and `-1 < 0`
/// (since `'-'` sorts before digits). Mixed integer/string comparisons use
/// the same textual rule.
pub fn compare_keys(a: KeyRef<'_>, b: KeyRef<'_>) -> Ordering {
    match (a, b) {
        (KeyRef::Str(x), KeyRef::Str(y)) => x.as_bytes().cmp(y.as_bytes()),
        (KeyRef::Int(x), KeyRef::Str(y)) => Decimal::new(x).as_bytes().cmp(y.as_bytes()),
        (KeyRef::Str(x), KeyRef::Int(y)) => x.as_bytes().cmp(Decimal::new(y).as_bytes()),
        (KeyRef::Int(x), KeyRef::Int(y)) => {
            Decimal::new(x).as_bytes().cmp(Decimal::new(y).as_bytes())
        }
    }
}

// Stack-formatted decimal text of an i32 ("-2147483648" is the longest).
struct Decimal {
    buf: [u8; 11],
    start: usize,
}

impl Decimal {
    fn new(n: i32) -> Self {
        let mut buf = [0u8; 11];
        let mut start = buf.len();
        let mut v = n.unsigned_abs();
        loop {
            start -= 1;
            buf[start] = b'0' + (v % 10) as u8;
            v /= 10;
            if v == 0 {
                break;
            }
        }
        if n < 0 {
            start -= 1;
            buf[start] = b'-';
        }
        Self { buf, start }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }
}
