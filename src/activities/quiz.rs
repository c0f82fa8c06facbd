//! Quick quiz over a shuffled question bank
//!
//! Each question has four options and exactly one correct answer. Answering
//! locks the question until the advance timer moves on to the next one.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::i18n::Language;
use crate::timers::{TimerKind, TimerRegistry};

/// Pause between answering and the next question
pub const ADVANCE_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub options: [&'static str; 4],
    /// Index into `options`
    pub correct: usize,
}

const EN_QUESTIONS: [Question; 8] = [
    Question {
        prompt: "How soon after your last cigarette does your heart rate drop?",
        options: ["20 minutes", "1 day", "1 week", "1 month"],
        correct: 0,
    },
    Question {
        prompt: "Which gas from smoke leaves your blood within a day?",
        options: ["Oxygen", "Carbon monoxide", "Nitrogen", "Helium"],
        correct: 1,
    },
    Question {
        prompt: "How long does a typical craving last?",
        options: ["Hours", "All day", "A few minutes", "A week"],
        correct: 2,
    },
    Question {
        prompt: "Which senses improve within 48 hours of quitting?",
        options: ["Hearing", "Taste and smell", "Sight", "Balance"],
        correct: 1,
    },
    Question {
        prompt: "What is the capital of Italy?",
        options: ["Milan", "Naples", "Turin", "Rome"],
        correct: 3,
    },
    Question {
        prompt: "How many legs does a spider have?",
        options: ["6", "8", "10", "12"],
        correct: 1,
    },
    Question {
        prompt: "Which planet is known as the red planet?",
        options: ["Venus", "Jupiter", "Mars", "Saturn"],
        correct: 2,
    },
    Question {
        prompt: "After one smoke-free year, the risk of heart disease...",
        options: ["Doubles", "Halves", "Stays the same", "Triples"],
        correct: 1,
    },
];

const IT_QUESTIONS: [Question; 8] = [
    Question {
        prompt: "Quanto tempo dopo l'ultima sigaretta scende il battito cardiaco?",
        options: ["20 minuti", "1 giorno", "1 settimana", "1 mese"],
        correct: 0,
    },
    Question {
        prompt: "Quale gas del fumo lascia il sangue entro un giorno?",
        options: ["Ossigeno", "Monossido di carbonio", "Azoto", "Elio"],
        correct: 1,
    },
    Question {
        prompt: "Quanto dura di solito una voglia di fumare?",
        options: ["Ore", "Tutto il giorno", "Pochi minuti", "Una settimana"],
        correct: 2,
    },
    Question {
        prompt: "Quali sensi migliorano entro 48 ore dallo smettere?",
        options: ["Udito", "Gusto e olfatto", "Vista", "Equilibrio"],
        correct: 1,
    },
    Question {
        prompt: "Qual è la capitale d'Italia?",
        options: ["Milano", "Napoli", "Torino", "Roma"],
        correct: 3,
    },
    Question {
        prompt: "Quante zampe ha un ragno?",
        options: ["6", "8", "10", "12"],
        correct: 1,
    },
    Question {
        prompt: "Quale pianeta è detto il pianeta rosso?",
        options: ["Venere", "Giove", "Marte", "Saturno"],
        correct: 2,
    },
    Question {
        prompt: "Dopo un anno senza fumo, il rischio di malattie cardiache...",
        options: ["Raddoppia", "Si dimezza", "Resta uguale", "Triplica"],
        correct: 1,
    },
];

/// Question bank for a language
pub fn questions(language: Language) -> &'static [Question] {
    match language {
        Language::En => &EN_QUESTIONS,
        Language::It => &IT_QUESTIONS,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    language: Language,
    order: Vec<usize>,
    index: usize,
    score: u32,
    /// Option picked for the current question, if answered
    selected: Option<usize>,
}

impl Quiz {
    pub fn start<R: Rng>(language: Language, rng: &mut R) -> Self {
        Self {
            language,
            order: shuffled_order(language, rng),
            index: 0,
            score: 0,
            selected: None,
        }
    }

    pub fn current(&self) -> &'static Question {
        let bank = questions(self.language);
        &bank[self.order[self.index]]
    }

    /// Pick an option. Returns whether it was correct, or None if the
    /// question is locked or the option does not exist.
    pub fn answer(
        &mut self,
        option: usize,
        timers: &mut TimerRegistry,
        now: Instant,
    ) -> Option<bool> {
        if self.selected.is_some() || option >= self.current().options.len() {
            return None;
        }
        let correct = option == self.current().correct;
        self.selected = Some(option);
        if correct {
            self.score += 1;
        }
        timers.schedule_once(TimerKind::QuizAdvance, now, ADVANCE_DELAY);
        Some(correct)
    }

    /// Move to the next question, wrapping at the end of the order
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.order.len();
        self.selected = None;
    }

    /// Switch language: new shuffle, score and position back to zero
    pub fn set_language<R: Rng>(
        &mut self,
        language: Language,
        rng: &mut R,
        timers: &mut TimerRegistry,
    ) {
        timers.cancel_kind(TimerKind::QuizAdvance);
        *self = Self::start(language, rng);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

/// Uniform random permutation of the bank (Fisher-Yates)
fn shuffled_order<R: Rng>(language: Language, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..questions(language).len()).collect();
    order.shuffle(rng);
    order
}
