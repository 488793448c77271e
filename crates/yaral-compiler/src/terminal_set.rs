/// Growable bitset of terminal ids, used for FIRST sets and LR(1) lookaheads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) struct TerminalSet {
    words: Vec<u64>,
}

impl TerminalSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(terminal: usize) -> Self {
        let mut set = Self::new();
        set.insert(terminal);
        set
    }

    /// Returns `true` if the terminal was not present.
    pub fn insert(&mut self, terminal: usize) -> bool {
        let (word, bit) = (terminal / 64, terminal % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let before = self.words[word];
        self.words[word] |= 1 << bit;
        before != self.words[word]
    }

    /// Returns `true` if anything was added.
    pub fn union_with(&mut self, other: &Self) -> bool {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        let mut changed = false;
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            let merged = *mine | theirs;
            changed |= merged != *mine;
            *mine = merged;
        }
        changed
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            (0..64)
                .filter(move |bit| word & (1 << bit) != 0)
                .map(move |bit| i * 64 + bit)
        })
    }
}
