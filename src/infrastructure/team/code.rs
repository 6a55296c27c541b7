//! Team join code generation

use rand::Rng;
use std::fmt::Debug;

use crate::domain::team::TeamCode;
use crate::domain::DomainError;

/// Source of candidate join codes
pub trait TeamCodeGenerator: Send + Sync + Debug {
    fn generate(&self) -> Result<TeamCode, DomainError>;
}

/// Draws each symbol uniformly from `TeamCode::ALPHABET` using the OS-seeded thread RNG
#[derive(Debug, Clone, Default)]
pub struct RandomTeamCodeGenerator;

impl RandomTeamCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl TeamCodeGenerator for RandomTeamCodeGenerator {
    fn generate(&self) -> Result<TeamCode, DomainError> {
        let mut rng = rand::thread_rng();

        let code: String = (0..TeamCode::LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..TeamCode::ALPHABET.len());
                TeamCode::ALPHABET[idx] as char
            })
            .collect();

        TeamCode::new(code)
            .map_err(|e| DomainError::internal(format!("Generated invalid team code: {}", e)))
    }
}

/// Replays a fixed list of codes, then repeats the last one
///
/// Lets tests force code collisions.
#[cfg(test)]
#[derive(Debug)]
pub struct SequenceTeamCodeGenerator {
    codes: std::sync::Mutex<Vec<TeamCode>>,
}

#[cfg(test)]
impl SequenceTeamCodeGenerator {
    pub fn new(codes: Vec<TeamCode>) -> Self {
        let mut codes = codes;
        codes.reverse();

        Self {
            codes: std::sync::Mutex::new(codes),
        }
    }
}

#[cfg(test)]
impl TeamCodeGenerator for SequenceTeamCodeGenerator {
    fn generate(&self) -> Result<TeamCode, DomainError> {
        let mut codes = self
            .codes
            .lock()
            .map_err(|_| DomainError::internal("Team code sequence lock poisoned"))?;

        match codes.len() {
            0 => Err(DomainError::internal("Team code sequence is empty")),
            1 => Ok(codes[0].clone()),
            _ => codes
                .pop()
                .ok_or_else(|| DomainError::internal("Team code sequence is empty")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_random_codes_are_valid() {
        let generator = RandomTeamCodeGenerator::new();

        for _ in 0..200 {
            let code = generator.generate().unwrap();
            assert_eq!(code.as_str().len(), TeamCode::LENGTH);
            assert!(
                code.as_str()
                    .bytes()
                    .all(|b| TeamCode::ALPHABET.contains(&b))
            );
        }
    }

    #[test]
    fn test_random_codes_vary() {
        let generator = RandomTeamCodeGenerator::new();

        let codes: HashSet<String> = (0..50)
            .map(|_| generator.generate().unwrap().as_str().to_string())
            .collect();

        assert!(codes.len() > 1);
    }

    #[test]
    fn test_sequence_generator() {
        let generator = SequenceTeamCodeGenerator::new(vec![
            TeamCode::new("AAAAAA").unwrap(),
            TeamCode::new("BBBBBB").unwrap(),
        ]);

        assert_eq!(generator.generate().unwrap().as_str(), "AAAAAA");
        assert_eq!(generator.generate().unwrap().as_str(), "BBBBBB");
        assert_eq!(generator.generate().unwrap().as_str(), "BBBBBB");
    }

    #[test]
    fn test_empty_sequence_errors() {
        let generator = SequenceTeamCodeGenerator::new(Vec::new());
        assert!(generator.generate().is_err());
    }
}
