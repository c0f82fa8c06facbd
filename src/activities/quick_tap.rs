/// Tap one control as fast as possible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuickTap {
    count: u32,
}

impl QuickTap {
    pub fn tap(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_every_tap() {
        let mut game = QuickTap::default();
        for _ in 0..25 {
            game.tap();
        }
        assert_eq!(game.count(), 25);
    }
}
