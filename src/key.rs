/// A platform-independent key value.
///
/// Key values are 16 bits wide. Printable keys below `0xFF00` use their
/// Unicode scalar value; function and navigation keys live in the `0xFF00`
/// block, matching X11 keysym numbering. Hosts map their platform key events
/// onto these values.
///
/// Letter keys are normalized to lowercase, with SHIFT carried in
/// [`Modifiers`]: `A` is the `a` key with SHIFT held. The typed character
/// itself travels in [`KeyEvent::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(u16);

impl KeyCode {
    /// Placeholder for keys the host cannot map.
    pub const UNKNOWN: KeyCode = KeyCode(0);
    pub const BACKSPACE: KeyCode = KeyCode(0xFF08);
    pub const TAB: KeyCode = KeyCode(0xFF09);
    pub const ENTER: KeyCode = KeyCode(0xFF0D);
    pub const ESCAPE: KeyCode = KeyCode(0xFF1B);
    pub const HOME: KeyCode = KeyCode(0xFF50);
    pub const LEFT: KeyCode = KeyCode(0xFF51);
    pub const UP: KeyCode = KeyCode(0xFF52);
    pub const RIGHT: KeyCode = KeyCode(0xFF53);
    pub const DOWN: KeyCode = KeyCode(0xFF54);
    pub const PAGE_UP: KeyCode = KeyCode(0xFF55);
    pub const PAGE_DOWN: KeyCode = KeyCode(0xFF56);
    pub const END: KeyCode = KeyCode(0xFF57);
    pub const INSERT: KeyCode = KeyCode(0xFF63);
    pub const DELETE: KeyCode = KeyCode(0xFFFF);

    const CHAR_LIMIT: u16 = 0xFF00;
    const F1: u16 = 0xFFBE;

    pub const fn from_raw(value: u16) -> Self {
        KeyCode(value)
    }

    /// The key for a printable character, if it fits below the named-key block.
    pub fn from_char(ch: char) -> Option<Self> {
        u16::try_from(u32::from(ch))
            .ok()
            .filter(|v| *v < Self::CHAR_LIMIT)
            .map(KeyCode)
    }

    /// Function key `F<n>`, for `n` in `1..=35`.
    pub fn function(n: u8) -> Option<Self> {
        (1..=35)
            .contains(&n)
            .then(|| KeyCode(Self::F1 + u16::from(n) - 1))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// The character this key represents, if it is a character key.
    pub fn as_char(self) -> Option<char> {
        if self.0 == 0 || self.0 >= Self::CHAR_LIMIT {
            return None;
        }
        char::from_u32(u32::from(self.0))
    }
}

bitflags::bitflags! {
    /// Keyboard modifier flags.
    ///
    /// These can be combined to represent multiple modifiers held simultaneously.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const META  = 0b1000;
    }
}

/// A key press delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,
    /// The character the host resolved for this press, if any.
    /// Absent for navigation keys and other non-printing keys.
    pub text: Option<char>,
    /// Modifier keys held during the key press.
    pub mods: Modifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: Modifiers) -> Self {
        Self {
            code,
            text: None,
            mods,
        }
    }

    /// A plain character press, as delivered by a text-input event.
    ///
    /// Uppercase letters become their lowercase key with SHIFT held, so the
    /// event encodes the same as one built from a key press.
    pub fn from_char(ch: char) -> Self {
        let mut lower = ch.to_lowercase();
        let (key, mods) = match (lower.next(), lower.next()) {
            (Some(l), None) if l != ch => (l, Modifiers::SHIFT),
            _ => (ch, Modifiers::empty()),
        };
        Self {
            code: KeyCode::from_char(key).unwrap_or(KeyCode::UNKNOWN),
            text: Some(ch),
            mods,
        }
    }

    pub fn with_text(mut self, ch: char) -> Self {
        self.text = Some(ch);
        self
    }

    /// Composite code of this event, see [`key_code_with`].
    pub fn combo(&self) -> u32 {
        key_code_with(self.code, self.mods)
    }
}

/// Plain integer value of a key.
pub fn key_code(key: KeyCode) -> u32 {
    u32::from(key.value())
}

/// Key value combined with the CTRL and SHIFT modifiers into one lookup key.
///
/// Other modifier bits are masked out, so `Ctrl+Alt+K` and `Ctrl+K` encode the same.
pub fn key_code_with(key: KeyCode, mods: Modifiers) -> u32 {
    let masked = mods & (Modifiers::CTRL | Modifiers::SHIFT);
    key_code(key) | (u32::from(masked.bits()) << 16)
}
