extern crate approx;
extern crate seqsignal;

use approx::assert_abs_diff_eq;

use seqsignal::abc::Dna;
use seqsignal::err::InvalidInput;
use seqsignal::pwm::ScoringMatrix;
use seqsignal::scan::Scan;
use seqsignal::seq::MaskedSequence;

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

const TARGET: &str = "CAGGTTGGAAACGTAA";

fn pssm() -> ScoringMatrix<Dna> {
    ScoringMatrix::build(MOTIFS, 1.0, 0.25).unwrap()
}

#[test]
fn profile_values() {
    let expected = [
        2.52243657997869,
        -1.3895864254494552,
        -4.097636626551666,
        -0.29097413678134565,
        1.0671493473718483,
        -0.4732956935753002,
        -4.94493448693887,
        -4.251787306378924,
    ];
    let seq = MaskedSequence::<Dna>::encode(TARGET);
    let profile = pssm().scan(&seq).unwrap();
    assert_eq!(profile.len(), TARGET.len() - MOTIFS[0].len() + 1);
    for ((_, x), &y) in profile.iter().zip(&expected) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-9);
    }
    assert_eq!(profile.argmax(), Some(0));
}

#[test]
fn scan_is_deterministic() {
    let pssm = pssm();
    let seq = MaskedSequence::<Dna>::encode(TARGET);
    let first = pssm.scan(&seq).unwrap();
    let second = pssm.scan(&seq).unwrap();
    assert_eq!(first, second);
}

#[test]
fn exact_fit() {
    let seq = MaskedSequence::<Dna>::encode(MOTIFS[2]);
    let profile = pssm().scan(&seq).unwrap();
    assert_eq!(profile.len(), 1);
}

#[test]
fn too_short() {
    let seq = MaskedSequence::<Dna>::encode("CAGG");
    assert_eq!(
        pssm().scan(&seq),
        Err(InvalidInput::SequenceTooShort {
            length: 4,
            window: 9
        })
    );
}

#[test]
fn masked_positions() {
    let expected = [
        3.007944395760391,
        -2.5135165221018543,
        -2.9189816302100198,
        0.19453367900035512,
    ];
    let seq = MaskedSequence::<Dna>::encode("CAGGTNGGAAAC");
    assert_eq!(seq.masked(), 1);
    let profile = pssm().scan(&seq).unwrap();
    assert_eq!(profile.len(), expected.len());
    for ((_, x), &y) in profile.iter().zip(&expected) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-9);
    }
}

#[cfg(feature = "parallel")]
#[test]
fn scan_all() {
    let pssm = pssm();
    let seqs = [
        MaskedSequence::<Dna>::encode(TARGET),
        MaskedSequence::<Dna>::encode("CAGG"),
    ];
    let profiles = pssm.scan_all(&seqs);
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0], pssm.scan(&seqs[0]));
    assert!(profiles[1].is_err());
}
