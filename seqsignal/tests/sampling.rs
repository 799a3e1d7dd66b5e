#![cfg(feature = "sampling")]

extern crate rand;
extern crate seqsignal;

use rand::rngs::StdRng;
use rand::SeedableRng;

use seqsignal::abc::Background;
use seqsignal::abc::Dna;
use seqsignal::abc::Nucleotide;
use seqsignal::abc::Symbol;
use seqsignal::markov::TransitionCounts;
use seqsignal::pwm::CountMatrix;
use seqsignal::seq::EncodedSequence;

#[test]
fn background_sample() {
    let mut rng = StdRng::seed_from_u64(42);
    let bg = Background::<Dna>::new([0.4, 0.1, 0.1, 0.4]).unwrap();
    let seq = bg.sample(&mut rng, 10_000).unwrap();
    assert_eq!(seq.len(), 10_000);

    let mut counts = [0usize; 4];
    for x in seq.iter() {
        counts[x.as_index()] += 1;
    }
    assert!(counts[Nucleotide::A as usize] > 3_500);
    assert!(counts[Nucleotide::C as usize] < 1_500);
}

#[test]
fn frequency_matrix_sample() {
    let mut rng = StdRng::seed_from_u64(42);
    let freqs = CountMatrix::<Dna>::from_motifs(["ACGT", "ACGT", "ACGT"])
        .unwrap()
        .to_freq(1e-12)
        .unwrap();
    for _ in 0..10 {
        let motif = freqs.sample(&mut rng).unwrap();
        assert_eq!(motif.len(), freqs.len());
        assert_eq!(motif.to_string(), "ACGT");
    }
}

#[test]
fn transition_matrix_sample() {
    let mut rng = StdRng::seed_from_u64(42);
    let chain = TransitionCounts::<Dna>::count_transitions("ACGTACGTACGT")
        .unwrap()
        .to_probabilities();
    let seq = chain.sample(&mut rng, 50).unwrap();
    assert_eq!(seq.len(), 50);

    // every transition of the sampled chain was observed during training
    let counts = TransitionCounts::from_sequence(&seq);
    for (i, row) in counts.matrix().iter().enumerate() {
        for (j, &n) in row.iter().enumerate() {
            if n > 0 {
                assert!(chain.matrix()[i][j] > 0.0);
            }
        }
    }
}

#[test]
fn sample_empty() {
    let mut rng = StdRng::seed_from_u64(0);
    let seq: EncodedSequence<Dna> = Background::<Dna>::uniform()
        .sample(&mut rng, 0)
        .unwrap();
    assert!(seq.is_empty());
}
