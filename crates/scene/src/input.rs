/// Directional keys the camera responds to.
///
/// Platform layers translate their own key codes into these; the scene never
/// sees raw window events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    pub const ALL: [Key; 4] = [Key::Left, Key::Right, Key::Up, Key::Down];

    /// Parse a key name such as `left` or `UP`.
    pub fn from_name(name: &str) -> Option<Key> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "up" => Some(Key::Up),
            "down" => Some(Key::Down),
            _ => None,
        }
    }
}

/// Snapshot of which directional keys are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl HeldKeys {
    pub fn set(&mut self, key: Key, held: bool) {
        match key {
            Key::Left => self.left = held,
            Key::Right => self.right = held,
            Key::Up => self.up = held,
            Key::Down => self.down = held,
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Up => self.up,
            Key::Down => self.down,
        }
    }

    pub fn any(&self) -> bool {
        Key::ALL.iter().any(|&k| self.is_held(k))
    }
}

impl FromIterator<Key> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut keys = HeldKeys::default();
        for key in iter {
            keys.set(key, true);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keys = HeldKeys::default();
        assert!(!keys.any());
        keys.set(Key::Left, true);
        assert!(keys.is_held(Key::Left));
        assert!(keys.any());
        keys.set(Key::Left, false);
        assert!(!keys.any());
    }

    #[test]
    fn parse_names() {
        assert_eq!(Key::from_name("left"), Some(Key::Left));
        assert_eq!(Key::from_name(" DOWN "), Some(Key::Down));
        assert_eq!(Key::from_name("space"), None);
    }

    #[test]
    fn collect_from_keys() {
        let keys: HeldKeys = [Key::Up, Key::Right].into_iter().collect();
        assert!(keys.up && keys.right);
        assert!(!keys.left && !keys.down);
    }
}
