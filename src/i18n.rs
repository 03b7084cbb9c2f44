//! UI strings in English and Spanish.

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    /// The other language; used by the in-game toggle.
    pub fn toggled(self) -> Self {
        match self {
            Self::En => Self::Es,
            Self::Es => Self::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
        }
    }

    pub fn strings(self) -> &'static Strings {
        match self {
            Self::En => &EN,
            Self::Es => &ES,
        }
    }
}

/// Every label the UI shows.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub start: &'static str,
    pub pause: &'static str,
    pub resume: &'static str,
    pub score: &'static str,
    pub lines: &'static str,
    pub game_over: &'static str,
    pub paused: &'static str,
    /// Instruction paragraphs, one per line in the side panel.
    pub instructions: &'static [&'static str],
    /// (keys, meaning) pairs for the controls panel.
    pub controls: &'static [(&'static str, &'static str)],
}

impl Strings {
    /// "Score: 120" / "Puntuación: 120".
    pub fn score_line(&self, score: u32) -> String {
        format!("{}: {}", self.score, score)
    }

    /// Label for the pause control, which doubles as resume.
    pub fn pause_label(&self, paused: bool) -> &'static str {
        if paused { self.resume } else { self.pause }
    }
}

static EN: Strings = Strings {
    title: "Zen-T-Block",
    start: "Start",
    pause: "Pause",
    resume: "Resume",
    score: "Score",
    lines: "Lines",
    game_over: "Game Over!",
    paused: "Paused",
    instructions: &[
        "Use the arrow keys or swipe with the mouse to move and rotate pieces.",
        "You can also use space, enter or a double click to change pieces.",
        "Fill lines to score points!",
    ],
    controls: &[
        ("← →", "move"),
        ("↑", "rotate"),
        ("↓", "drop"),
        ("Space", "change piece"),
        ("S", "start"),
        ("P", "pause"),
        ("L", "español"),
        ("Q", "quit"),
    ],
};

static ES: Strings = Strings {
    title: "Zen-T-Block",
    start: "Iniciar",
    pause: "Pausar",
    resume: "Reanudar",
    score: "Puntuación",
    lines: "Líneas",
    game_over: "¡Fin del juego!",
    paused: "En pausa",
    instructions: &[
        "Usa las flechas del teclado o desliza con el ratón para mover y rotar las piezas.",
        "También puedes usar espacio, enter o doble clic para cambiar la pieza.",
        "¡Llena filas para ganar puntos!",
    ],
    controls: &[
        ("← →", "mover"),
        ("↑", "rotar"),
        ("↓", "bajar"),
        ("Espacio", "cambiar pieza"),
        ("S", "iniciar"),
        ("P", "pausar"),
        ("L", "english"),
        ("Q", "salir"),
    ],
};
