//! Localised copy
//!
//! Every user-visible string lives here, one static table per language.
//! Placeholders (`{goal}`, `{elapsed}`, `{cost}`, `{count}`) are substituted by
//! the caller with [`fill`].

use serde::{Deserialize, Serialize};

/// Supported interface languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    It,
}

impl Language {
    /// Switch to the other language
    pub fn toggle(self) -> Self {
        match self {
            Language::En => Language::It,
            Language::It => Language::En,
        }
    }

    /// Short code ("en" / "it")
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::It => "it",
        }
    }

    /// Currency symbol suggested during onboarding
    pub fn default_currency(&self) -> &'static str {
        match self {
            Language::En => "$",
            Language::It => "€",
        }
    }

    /// Copy table for this language
    pub fn strings(&self) -> &'static Strings {
        match self {
            Language::En => &EN,
            Language::It => &IT,
        }
    }
}

/// Replace every `{key}` placeholder in `template`
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Copy table
#[derive(Debug)]
pub struct Strings {
    // Dashboard
    pub app_title: &'static str,
    pub money_saved: &'static str,
    pub units_avoided: &'static str,
    pub time_passed: &'static str,
    pub goal_progress: &'static str,
    pub projection_title: &'static str,
    pub dashboard_hints: &'static str,

    // Elapsed-time units (singular, plural)
    pub day: (&'static str, &'static str),
    pub hour: (&'static str, &'static str),
    pub minute: (&'static str, &'static str),

    // Craving flow
    pub urge_modal_title: &'static str,
    pub urge_rating_label: &'static str,
    pub rating_hints: &'static str,
    pub context_label: &'static str,
    pub analyzing: &'static str,
    pub urge_low_title: &'static str,
    pub urge_low_text: &'static str,
    pub urge_high_title: &'static str,
    pub urge_high_text: &'static str,
    pub lost_from_savings: &'static str,
    pub guided_hints: &'static str,
    pub high_hints: &'static str,
    pub timer_active: &'static str,
    pub banner_hints: &'static str,
    pub countdown_done: &'static str,

    // Relapse (outside the craving flow)
    pub lapse_title: &'static str,
    pub lapse_text: &'static str,
    pub lapse_hints: &'static str,

    // Milestones, in threshold order
    pub milestones: [&'static str; 4],

    // Activities
    pub breathing_title: &'static str,
    pub inhale: &'static str,
    pub hold: &'static str,
    pub exhale: &'static str,
    pub breaths_completed: &'static str,
    pub tap_title: &'static str,
    pub tap_hint: &'static str,
    pub quiz_title: &'static str,
    pub quiz_correct: &'static str,
    pub quiz_wrong: &'static str,
    pub quick_tap_title: &'static str,
    pub score: &'static str,

    // Fallback motivation, by situational context
    pub fallback_neutral: &'static str,
    pub fallback_coffee: &'static str,
    pub fallback_alcohol: &'static str,
    pub fallback_stress: &'static str,
    pub fallback_boredom: &'static str,
    pub fallback_meal: &'static str,

    // Onboarding / account
    pub welcome: &'static str,
    pub onboarding_questions: [&'static str; 5],
    pub onboarding_hints: &'static str,
    pub sign_in_title: &'static str,
    pub sign_in_prompt: &'static str,
    pub sign_in_hints: &'static str,
    pub setup_error_title: &'static str,
    pub setup_error_hints: &'static str,

    // Notifications
    pub relapse_not_saved: &'static str,
    pub stats_not_saved: &'static str,
    pub profile_load_failed: &'static str,
}

static EN: Strings = Strings {
    app_title: "Respira",
    money_saved: "Money saved",
    units_avoided: "Cigarettes not smoked",
    time_passed: "Smoke-free for",
    goal_progress: "Your goal",
    projection_title: "Savings over the next 30 days",
    dashboard_hints: "c: craving | r: I smoked | e: edit stats | l: language | u: sign out | q: quit",

    day: ("day", "days"),
    hour: ("hour", "hours"),
    minute: ("minute", "minutes"),

    urge_modal_title: "How strong is the urge?",
    urge_rating_label: "Urge intensity",
    rating_hints: "drag the dial or ←/→ | Tab: situation | Enter: analyse | Esc: close",
    context_label: "Situation",
    analyzing: "Finding the right words...",
    urge_low_title: "You can ride this out",
    urge_low_text: "Cravings peak and fade within minutes. Stay with it for ten.",
    urge_high_title: "This one is strong",
    urge_high_text: "One cigarette costs {cost} and pushes \"{goal}\" further away.",
    lost_from_savings: "lost from savings",
    guided_hints: "n: next activity | y: I resisted | m: minimise | Esc: close",
    high_hints: "y: I resisted | s: I smoked | Esc: close",
    timer_active: "Timer active",
    banner_hints: "o: open | x: cancel",
    countdown_done: "Ten minutes done. The urge has passed its peak.",

    lapse_title: "It happens. Start again.",
    lapse_text: "Your counter restarts now. \"{goal}\" is still waiting for you.",
    lapse_hints: "y: restart my counter | n/Esc: cancel",

    milestones: [
        "2 min - Heart rate normalizes",
        "5 min - Improved oxygenation",
        "8 min - Nicotine levels halved",
        "9.5 min - Almost there!",
    ],

    breathing_title: "Breathing exercise",
    inhale: "Inhale",
    hold: "Hold",
    exhale: "Exhale",
    breaths_completed: "Breaths completed: {count}",
    tap_title: "Crush the cigarettes!",
    tap_hint: "click a target or press its number",
    quiz_title: "Quick quiz",
    quiz_correct: "Correct!",
    quiz_wrong: "Not quite.",
    quick_tap_title: "Tap as fast as you can! (space)",
    score: "Score",

    fallback_neutral: "Take a deep breath. Remember \"{goal}\"? Every cigarette you skip is a brick in that foundation. You've already conquered {elapsed}, don't stop now!",
    fallback_coffee: "Coffee tastes better without smoke. Sip slowly: you've been free for {elapsed} and \"{goal}\" is getting closer.",
    fallback_alcohol: "Drinks lower your guard, not your strength. {elapsed} smoke-free is worth more than this moment. Think of \"{goal}\".",
    fallback_stress: "Smoking won't fix the stress, it adds to it. Breathe out slowly. {elapsed} of progress and \"{goal}\" are on your side.",
    fallback_boredom: "Boredom passes faster than a cigarette burns. Play a round below; you've already made it through {elapsed}. \"{goal}\" is waiting.",
    fallback_meal: "The after-meal craving is a habit, not a need. Get up and move. {elapsed} smoke-free, one step closer to \"{goal}\".",

    welcome: "Welcome to Respira",
    onboarding_questions: [
        "How many cigarettes did you smoke per day?",
        "How much does a pack cost?",
        "How many cigarettes are in a pack?",
        "What are you saving for?",
        "How much does it cost?",
    ],
    onboarding_hints: "Enter: next | Backspace: delete | Esc: cancel",
    sign_in_title: "Sign in",
    sign_in_prompt: "Your name:",
    sign_in_hints: "Enter: continue | Esc: quit",
    setup_error_title: "Storage setup problem",
    setup_error_hints: "u: sign out | q: quit",

    relapse_not_saved: "Counter restarted, but it could not be saved: {error}",
    stats_not_saved: "Your changes were not saved: {error}",
    profile_load_failed: "Could not read your profile, starting over: {error}",
};

static IT: Strings = Strings {
    app_title: "Respira",
    money_saved: "Soldi risparmiati",
    units_avoided: "Sigarette non fumate",
    time_passed: "Senza fumo da",
    goal_progress: "Il tuo sogno",
    projection_title: "Risparmi nei prossimi 30 giorni",
    dashboard_hints: "c: voglia | r: ho fumato | e: modifica | l: lingua | u: esci | q: chiudi",

    day: ("giorno", "giorni"),
    hour: ("ora", "ore"),
    minute: ("minuto", "minuti"),

    urge_modal_title: "Quanto è forte la voglia?",
    urge_rating_label: "Intensità della voglia",
    rating_hints: "trascina il quadrante o ←/→ | Tab: situazione | Invio: analizza | Esc: chiudi",
    context_label: "Situazione",
    analyzing: "Cerco le parole giuste...",
    urge_low_title: "Puoi superarla",
    urge_low_text: "La voglia raggiunge il picco e svanisce in pochi minuti. Resisti per dieci.",
    urge_high_title: "Questa è forte",
    urge_high_text: "Una sigaretta costa {cost} e allontana \"{goal}\".",
    lost_from_savings: "persi dai risparmi",
    guided_hints: "n: prossima attività | y: ho resistito | m: riduci | Esc: chiudi",
    high_hints: "y: ho resistito | s: ho fumato | Esc: chiudi",
    timer_active: "Timer attivo",
    banner_hints: "o: apri | x: annulla",
    countdown_done: "Dieci minuti fatti. La voglia ha superato il picco.",

    lapse_title: "Succede. Ricomincia.",
    lapse_text: "Il contatore riparte da adesso. \"{goal}\" ti aspetta ancora.",
    lapse_hints: "y: riparti | n/Esc: annulla",

    milestones: [
        "2 min - Il battito cardiaco si normalizza",
        "5 min - Ossigenazione migliorata",
        "8 min - Livelli di nicotina dimezzati",
        "9.5 min - Quasi fatto!",
    ],

    breathing_title: "Esercizio di respirazione",
    inhale: "Inspira",
    hold: "Trattieni",
    exhale: "Espira",
    breaths_completed: "Respiri completati: {count}",
    tap_title: "Schiaccia le sigarette!",
    tap_hint: "clicca un bersaglio o premi il suo numero",
    quiz_title: "Quiz veloce",
    quiz_correct: "Giusto!",
    quiz_wrong: "Non proprio.",
    quick_tap_title: "Tocca più veloce che puoi! (spazio)",
    score: "Punti",

    fallback_neutral: "Fai un respiro profondo. Ricordi \"{goal}\"? Ogni sigaretta che eviti è un mattone per quel sogno. Hai già superato {elapsed}, non fermarti proprio ora!",
    fallback_coffee: "Il caffè è più buono senza fumo. Sorseggia piano: sei libero da {elapsed} e \"{goal}\" è più vicino.",
    fallback_alcohol: "L'alcol abbassa le difese, non la tua forza. {elapsed} senza fumo valgono più di questo momento. Pensa a \"{goal}\".",
    fallback_stress: "Fumare non toglie lo stress, lo aumenta. Espira lentamente. {elapsed} di progressi e \"{goal}\" sono dalla tua parte.",
    fallback_boredom: "La noia passa prima di una sigaretta. Gioca un turno qui sotto; hai già superato {elapsed}. \"{goal}\" ti aspetta.",
    fallback_meal: "La voglia dopo il pasto è un'abitudine, non un bisogno. Alzati e muoviti. {elapsed} senza fumo, un passo più vicino a \"{goal}\".",

    welcome: "Benvenuto in Respira",
    onboarding_questions: [
        "Quante sigarette fumavi al giorno?",
        "Quanto costa un pacchetto?",
        "Quante sigarette ci sono in un pacchetto?",
        "Per cosa stai risparmiando?",
        "Quanto costa?",
    ],
    onboarding_hints: "Invio: avanti | Backspace: cancella | Esc: annulla",
    sign_in_title: "Accedi",
    sign_in_prompt: "Il tuo nome:",
    sign_in_hints: "Invio: continua | Esc: esci",
    setup_error_title: "Problema di configurazione dell'archivio",
    setup_error_hints: "u: esci dall'account | q: chiudi",

    relapse_not_saved: "Contatore azzerato, ma non è stato salvato: {error}",
    stats_not_saved: "Le modifiche non sono state salvate: {error}",
    profile_load_failed: "Impossibile leggere il profilo, si ricomincia: {error}",
};
