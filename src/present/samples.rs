// Built-in playground programs

/// A named sample program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub name: &'static str,
    pub code: &'static str,
}

pub const DEFAULT_CODE: &str = "sun_we
    chilla_we \"Hello Jatti!\"
ja_we
";

pub const SAMPLES: &[Sample] = &[
    Sample {
        name: "Hello",
        code: DEFAULT_CODE,
    },
    Sample {
        name: "If/Else",
        code: "sun_we
    chal_oye x ban 5
    je x vadha_hai 3
        chilla_we \"big\"
    nahin_taan
        chilla_we \"small\"
ja_we
",
    },
    Sample {
        name: "Loops",
        code: "sun_we
    chal_oye total ban 0
    har_ek i range_banao(1, 6)
        chal_oye total ban total + i
    chilla_we total
ja_we
",
    },
    Sample {
        name: "Try/Pakad",
        code: "sun_we
    chal_koshish_karle
        chal_oye x ban 10 / 0
    pakad err
        chilla_we err
ja_we
",
    },
];

/// Look a sample up by name, ignoring case
pub fn find(name: &str) -> Option<&'static str> {
    SAMPLES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .map(|s| s.code)
}
