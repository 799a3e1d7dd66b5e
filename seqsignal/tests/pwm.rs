extern crate approx;
extern crate seqsignal;
extern crate typenum;

use approx::assert_abs_diff_eq;

use seqsignal::abc::Alphabet;
use seqsignal::abc::Background;
use seqsignal::abc::Dna;
use seqsignal::abc::Nucleotide;
use seqsignal::abc::Symbol;
use seqsignal::err::InvalidInput;
use seqsignal::err::InvalidSymbol;
use seqsignal::pwm::CountMatrix;
use seqsignal::pwm::ScoringMatrix;
use seqsignal::pwm::ScoringMatrixBuilder;

const MOTIFS: &[&str] = &[
    "GAGGTAAAC",
    "TCCGTAAGT",
    "CAGGTTGGA",
    "ACAGTCAGT",
    "TAGGTCATT",
    "TAGGTACTG",
    "ATGGTAACT",
    "CAGGTATAC",
    "TGTGTGAGT",
];

#[test]
fn count_columns_sum_to_motif_number() {
    let counts = CountMatrix::<Dna>::from_motifs(MOTIFS).unwrap();
    assert_eq!(counts.len(), 9);
    for row in counts.matrix() {
        assert_eq!(row.iter().sum::<u32>(), MOTIFS.len() as u32);
    }
    assert_eq!(&counts.matrix()[0], &[2, 2, 1, 4]);
    assert_eq!(&counts.matrix()[3], &[0, 0, 9, 0]);
    assert_eq!(&counts.matrix()[4], &[0, 0, 0, 9]);
}

#[test]
fn frequencies_sum_to_one() {
    let freqs = CountMatrix::<Dna>::from_motifs(MOTIFS)
        .unwrap()
        .to_freq(1.0)
        .unwrap();
    for row in freqs.matrix() {
        assert_abs_diff_eq!(row.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
}

#[test]
fn scoring_matrix_values() {
    let pssm = ScoringMatrix::<Dna>::build(MOTIFS, 1.0, 0.25).unwrap();
    let a = Nucleotide::A as usize;
    let g = Nucleotide::G as usize;
    let t = Nucleotide::T as usize;
    assert_abs_diff_eq!(pssm.matrix()[0][a], -0.08004270767353637, epsilon = 1e-9);
    assert_abs_diff_eq!(pssm.matrix()[3][g], 1.1239300966523995, epsilon = 1e-9);
    assert_abs_diff_eq!(pssm.matrix()[4][t], 1.1239300966523995, epsilon = 1e-9);
    assert_abs_diff_eq!(pssm.max_score(), 6.483249749576268, epsilon = 1e-9);
    assert_abs_diff_eq!(pssm.min_score(), -5.755864703155199, epsilon = 1e-9);
}

#[test]
fn scoring_matrix_is_log_ratio_of_frequencies() {
    let freqs = CountMatrix::<Dna>::from_motifs(MOTIFS)
        .unwrap()
        .to_freq(0.5)
        .unwrap();
    let bg = Background::<Dna>::new([0.3, 0.2, 0.2, 0.3]).unwrap();
    let pssm = freqs.to_scoring(bg.clone());
    for (f_row, s_row) in freqs.matrix().iter().zip(pssm.matrix()) {
        for ((&f, &s), &b) in f_row.iter().zip(s_row).zip(bg.frequencies()) {
            assert_abs_diff_eq!(s.exp() * b, f, epsilon = 1e-12);
        }
    }
}

#[test]
fn builder_defaults() {
    let built = ScoringMatrixBuilder::new().build::<Dna, _>(MOTIFS).unwrap();
    let explicit = ScoringMatrix::<Dna>::build(MOTIFS, 1.0, 0.25).unwrap();
    assert_eq!(built, explicit);
}

#[test]
fn build_errors() {
    let empty: &[&str] = &[];
    assert_eq!(
        ScoringMatrix::<Dna>::build(empty, 1.0, 0.25),
        Err(InvalidInput::EmptyMotifs)
    );
    assert_eq!(
        ScoringMatrix::<Dna>::build(["GAGG", "TCC"], 1.0, 0.25),
        Err(InvalidInput::LengthMismatch {
            index: 1,
            length: 3,
            expected: 4
        })
    );
    assert_eq!(
        ScoringMatrix::<Dna>::build(["GAGG", "TCNG"], 1.0, 0.25),
        Err(InvalidInput::InvalidSymbol {
            symbol: 'N',
            position: 2
        })
    );
    assert!(matches!(
        ScoringMatrix::<Dna>::build(MOTIFS, -1.0, 0.25),
        Err(InvalidInput::InvalidParameter { .. })
    ));
    assert!(matches!(
        ScoringMatrix::<Dna>::build(MOTIFS, 1.0, 0.0),
        Err(InvalidInput::InvalidParameter { .. })
    ));
}

// --- Binary alphabet ---------------------------------------------------------

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
struct Binary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bit {
    A = 0,
    C = 1,
}

impl Symbol for Bit {
    fn as_index(&self) -> usize {
        *self as usize
    }

    fn as_ascii(&self) -> u8 {
        match self {
            Bit::A => b'A',
            Bit::C => b'C',
        }
    }

    fn from_ascii(c: u8) -> Result<Self, InvalidSymbol> {
        match c {
            b'A' => Ok(Bit::A),
            b'C' => Ok(Bit::C),
            _ => Err(InvalidSymbol(c as char)),
        }
    }
}

impl Alphabet for Binary {
    type Symbol = Bit;
    type K = typenum::consts::U2;

    fn symbols() -> &'static [Bit] {
        &[Bit::A, Bit::C]
    }

    fn as_str() -> &'static str {
        "AC"
    }
}

#[test]
fn binary_alphabet() {
    let pssm = ScoringMatrix::<Binary>::build(["AC", "AA", "CA"], 1.0, 0.5).unwrap();
    assert_eq!(pssm.matrix().columns(), 2);
    assert_eq!(pssm.len(), 2);
    for row in pssm.matrix() {
        assert_abs_diff_eq!(row[0], 0.1823215567939546, epsilon = 1e-9);
        assert_abs_diff_eq!(row[1], -0.2231435513142097, epsilon = 1e-9);
    }
    assert_eq!(
        ScoringMatrix::<Binary>::build(["AC", "AG"], 1.0, 0.5),
        Err(InvalidInput::InvalidSymbol {
            symbol: 'G',
            position: 1
        })
    );
}

#[test]
fn binary_alphabet_stages() {
    let counts = CountMatrix::<Binary>::from_motifs(["AAAA", "AAAA"]).unwrap();
    for row in counts.matrix() {
        assert_eq!(row, &[2, 0]);
    }
    for row in &counts.pseudocounted(1.0).unwrap() {
        assert_eq!(row, &[3.0, 1.0]);
    }
    let freqs = counts.to_freq(1.0).unwrap();
    for row in freqs.matrix() {
        assert_abs_diff_eq!(row[0], 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(row[1], 0.25, epsilon = 1e-12);
    }
    let pssm = freqs.to_scoring(Background::<Binary>::constant(0.5).unwrap());
    for row in pssm.matrix() {
        assert_abs_diff_eq!(row[0], 1.5f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(row[1], 0.5f64.ln(), epsilon = 1e-12);
    }
}

#[test]
fn conserved_base_trends_to_null_ratio() {
    let limit = (1.0f64 / 0.25).ln();
    let mut last = f64::NEG_INFINITY;
    for n in [1, 10, 100, 1000] {
        let motifs = vec!["G"; n];
        let pssm = ScoringMatrix::<Dna>::build(&motifs, 1.0, 0.25).unwrap();
        let score = pssm.matrix()[0][Nucleotide::G as usize];
        assert!(score > last);
        assert!(score < limit);
        last = score;
    }
    assert_abs_diff_eq!(last, limit, epsilon = 1e-2);
}
