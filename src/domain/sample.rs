//! Demo tree used to seed a fresh store.

use crate::domain::entities::{Card, CardFile, Directory};
use crate::domain::error::DomainError;
use crate::domain::name::NodeName;

fn dir(name: &str) -> Result<Directory, DomainError> {
    Ok(Directory::new(NodeName::parse(name)?))
}

fn deck(name: &str, cards: Vec<Card>) -> Result<CardFile, DomainError> {
    Ok(CardFile::new(NodeName::parse(name)?).with_cards(cards))
}

/// Build the sample tree with fresh ids.
pub fn sample_tree(root_name: &str) -> Result<Directory, DomainError> {
    let schule = dir("Schule")?.with_children(vec![
        deck(
            "RW Test am 3-6-2025",
            vec![
                Card::new(
                    "Imparitätisches Realisationsprinzip",
                    "Nicht-realisierte Gewinne sind NIE in der Bilanz auszuweisen, \
                     nicht-realisierte Verluste sind in der Bilanz IMMER auszuweisen.",
                ),
                Card::new(
                    "Anhang",
                    "Um ein möglichst getreues Bild über Finanz-, Vermögens- und Ertragslage \
                     des Unternehmens zu verschaffen, werden viele Details im Anhang angehängt.",
                ),
            ],
        )?
        .into(),
        deck(
            "TypeScript",
            vec![Card::new(
                "Wie heißt der Utility-Type, der jede Eigenschaft eines Objekts optional macht?",
                "Partial<T>",
            )],
        )?
        .into(),
    ]);

    let kochen = deck(
        "Kochen",
        vec![Card::new("Wo kocht man Wasser?", "Am Herd! Wo denn sonst?")],
    )?;

    let pflanzen = dir("Pflanzen")?.with_children(vec![
        deck("Graeser", vec![])?.into(),
        deck("Fruechte", vec![])?.into(),
    ]);
    let natur = dir("Natur")?.with_children(vec![deck("Tiere", vec![])?.into(), pflanzen.into()]);
    let allgemeinwissen = dir("Allgemeinwissen")?.with_children(vec![
        deck(
            "Buecher",
            vec![Card::new("Karpowicz", "- 1984\n- Fahrenheit 451")],
        )?
        .into(),
        natur.into(),
    ]);

    Ok(dir(root_name)?.with_children(vec![
        schule.into(),
        kochen.into(),
        allgemeinwissen.into(),
    ]))
}
