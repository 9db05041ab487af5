//! Builders for MIM-stereotyped UML elements.
//!
//! Every builder resolves its stereotype by name in the loaded profile
//! first; the stereotype must exist exactly once or the builder errors. New
//! elements get the original tool's default names.

use crate::error::{AppError, Result};
use crate::prompt::Prompt;
use crate::uml::element::{Element, ElementKind, ElementRef, find_class_mut};

pub const ST_OBJECTTYPE: &str = "Objecttype";
pub const ST_ATTRIBUUTSOORT: &str = "Attribuutsoort";
pub const ST_KEUZE: &str = "Keuze";
pub const ST_RELATIESOORT: &str = "Relatiesoort";
pub const ST_GENERALISATIE: &str = "Generalisatie";

/// Resolve a stereotype by name anywhere in the project (profile included).
/// Zero matches and multiple matches are both errors.
pub fn resolve_stereotype<'a>(root: &'a Element, name: &str) -> Result<&'a Element> {
    let matches = root.find_all(|element| {
        element.kind == ElementKind::Stereotype && element.name() == name
    });
    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(AppError::StereotypeNotFound(name.to_string())),
        _ => Err(AppError::AmbiguousStereotype(name.to_string())),
    }
}

fn model_mut(root: &mut Element) -> Result<&mut Element> {
    root.owned_of_kind_mut(&ElementKind::Model)
        .ok_or(AppError::MissingSection("UMLModel"))
}

/// The class must exist and carry the `<<Objecttype>>` stereotype.
fn objecttype_mut<'a>(root: &'a mut Element, class_name: &str) -> Result<&'a mut Element> {
    let objecttype_ref = resolve_stereotype(root, ST_OBJECTTYPE)?.reference_to();
    let class = find_class_mut(root, class_name)
        .ok_or_else(|| AppError::ClassNotFound(class_name.to_string()))?;
    if class.stereotype.as_ref() != Some(&objecttype_ref) {
        return Err(AppError::NotAnObjecttype(class_name.to_string()));
    }
    Ok(class)
}

fn new_stereotyped(kind: ElementKind, name: &str, stereotype: ElementRef) -> Element {
    let mut element = Element::new(kind, name);
    element.stereotype = Some(stereotype);
    element
}

/// Create an `<<Objecttype>>` class under the model. Returns the new id.
pub fn create_objecttype(root: &mut Element) -> Result<String> {
    create_class(root, ST_OBJECTTYPE, "ObjecttypeNew")
}

/// Create a `<<Keuze>>` class under the model. Returns the new id.
pub fn create_keuze(root: &mut Element) -> Result<String> {
    create_class(root, ST_KEUZE, "KeuzeNew")
}

fn create_class(root: &mut Element, stereotype: &str, default_name: &str) -> Result<String> {
    let stereotype_ref = resolve_stereotype(root, stereotype)?.reference_to();
    let model = model_mut(root)?;
    let mut class = new_stereotyped(ElementKind::Class, default_name, stereotype_ref);
    class.set_parent(&model.id.clone());
    let id = class.id.clone();
    model.owned_elements.push(class);
    Ok(id)
}

/// Add an `<<Attribuutsoort>>` attribute to an `<<Objecttype>>` class.
pub fn add_attribuut(root: &mut Element, class_name: &str) -> Result<String> {
    let attribuut_ref = resolve_stereotype(root, ST_ATTRIBUUTSOORT)?.reference_to();
    let class = objecttype_mut(root, class_name)?;
    let mut attribuut = new_stereotyped(ElementKind::Attribute, "attribuutNew", attribuut_ref);
    attribuut.set_parent(&class.id.clone());
    let id = attribuut.id.clone();
    class.attributes.push(attribuut);
    Ok(id)
}

/// Add a `<<Keuze>>`-typed attribute to an `<<Objecttype>>` class. The
/// attribute's type is picked from the existing `<<Keuze>>` classes;
/// cancelling the picker creates nothing.
pub fn add_keuze(
    root: &mut Element,
    class_name: &str,
    prompt: &mut dyn Prompt,
) -> Result<Option<String>> {
    let keuze_ref = resolve_stereotype(root, ST_KEUZE)?.reference_to();

    let keuzes = root.find_all(|element| {
        element.kind == ElementKind::Class && element.stereotype.as_ref() == Some(&keuze_ref)
    });
    let labels: Vec<String> = keuzes.iter().map(|k| k.name().to_string()).collect();
    let chosen: Vec<ElementRef> = keuzes.iter().map(|k| k.reference_to()).collect();

    let Some(index) = prompt.select("Selecteer een <<Keuze>>", &labels)? else {
        return Ok(None);
    };
    let keuze_type = chosen[index].clone();

    let class = objecttype_mut(root, class_name)?;
    let mut attribuut = new_stereotyped(ElementKind::Attribute, "attribuutNew", keuze_ref);
    attribuut.type_ref = Some(keuze_type);
    attribuut.set_parent(&class.id.clone());
    let id = attribuut.id.clone();
    class.attributes.push(attribuut);
    Ok(Some(id))
}

/// Create a `<<Relatiesoort>>` association between two classes, owned by the
/// model. A directed relatiesoort gets a navigable second end.
pub fn create_relatiesoort(
    root: &mut Element,
    source_class: &str,
    target_class: &str,
    directed: bool,
) -> Result<String> {
    let stereotype_ref = resolve_stereotype(root, ST_RELATIESOORT)?.reference_to();
    let source_ref = class_ref(root, source_class)?;
    let target_ref = class_ref(root, target_class)?;

    let default_name = if directed {
        "DirectedRelatiesoortNew"
    } else {
        "RelatiesoortNew"
    };
    let mut association =
        new_stereotyped(ElementKind::Association, default_name, stereotype_ref);

    let mut end1 = Element::new(ElementKind::AssociationEnd, "");
    end1.name = None;
    end1.reference = Some(source_ref);
    end1.set_parent(&association.id);

    let mut end2 = Element::new(ElementKind::AssociationEnd, "");
    end2.name = None;
    end2.reference = Some(target_ref);
    end2.set_parent(&association.id);
    if directed {
        end2.extra
            .insert("navigable".to_string(), "navigable".into());
    }

    association.end1 = Some(Box::new(end1));
    association.end2 = Some(Box::new(end2));

    let model = model_mut(root)?;
    association.set_parent(&model.id.clone());
    let id = association.id.clone();
    model.owned_elements.push(association);
    Ok(id)
}

/// Create a `<<Generalisatie>>` from a subtype class to its supertype,
/// owned by the subtype.
pub fn create_generalisatie(
    root: &mut Element,
    subtype_class: &str,
    supertype_class: &str,
) -> Result<String> {
    let stereotype_ref = resolve_stereotype(root, ST_GENERALISATIE)?.reference_to();
    let source_ref = class_ref(root, subtype_class)?;
    let target_ref = class_ref(root, supertype_class)?;

    let mut generalization =
        new_stereotyped(ElementKind::Generalization, "subtype", stereotype_ref);
    generalization.source = Some(source_ref);
    generalization.target = Some(target_ref);

    let class = find_class_mut(root, subtype_class)
        .ok_or_else(|| AppError::ClassNotFound(subtype_class.to_string()))?;
    generalization.set_parent(&class.id.clone());
    let id = generalization.id.clone();
    class.owned_elements.push(generalization);
    Ok(id)
}

fn class_ref(root: &Element, name: &str) -> Result<ElementRef> {
    root.find_all(|element| element.kind == ElementKind::Class && element.name() == name)
        .first()
        .map(|class| class.reference_to())
        .ok_or_else(|| AppError::ClassNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::ScriptedPrompt;

    /// Project with a model (two classes) and a profile carrying the MIM
    /// stereotypes, the shape a retrieve leaves behind.
    fn project() -> Element {
        let mut profile = Element::new(ElementKind::Profile, "MIM-profiel");
        for name in [
            ST_OBJECTTYPE,
            ST_ATTRIBUUTSOORT,
            ST_KEUZE,
            ST_RELATIESOORT,
            ST_GENERALISATIE,
        ] {
            profile
                .owned_elements
                .push(Element::new(ElementKind::Stereotype, name));
        }

        let mut model = Element::new(ElementKind::Model, "Gegevensmodel");
        let objecttype_ref = profile.owned_elements[0].reference_to();
        let keuze_ref = profile.owned_elements[2].reference_to();

        let mut persoon = Element::new(ElementKind::Class, "Persoon");
        persoon.stereotype = Some(objecttype_ref.clone());
        model.owned_elements.push(persoon);

        let mut organisatie = Element::new(ElementKind::Class, "Organisatie");
        organisatie.stereotype = Some(objecttype_ref);
        model.owned_elements.push(organisatie);

        let mut geslacht = Element::new(ElementKind::Class, "GeslachtKeuze");
        geslacht.stereotype = Some(keuze_ref);
        model.owned_elements.push(geslacht);

        let mut root = Element::new(ElementKind::Project, "Common Data");
        root.owned_elements.push(model);
        root.owned_elements.push(profile);
        root
    }

    #[test]
    fn missing_stereotype_is_an_error() {
        let root = Element::new(ElementKind::Project, "leeg");
        let err = resolve_stereotype(&root, ST_OBJECTTYPE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Geen \"Stereotype\" met de naam \"Objecttype\" gevonden!"
        );
    }

    #[test]
    fn duplicate_stereotype_is_an_error() {
        let mut root = project();
        root.owned_elements
            .push(Element::new(ElementKind::Stereotype, ST_OBJECTTYPE));
        let err = resolve_stereotype(&root, ST_OBJECTTYPE).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Twee of meer \"Stereotypen\" met de naam \"Objecttype\" gevonden!"
        );
    }

    #[test]
    fn create_objecttype_lands_under_the_model() {
        let mut root = project();
        let id = create_objecttype(&mut root).unwrap();

        let objecttype_id = resolve_stereotype(&root, ST_OBJECTTYPE).unwrap().id.clone();
        let model = root.owned_of_kind(&ElementKind::Model).unwrap();
        let created = model
            .owned_elements
            .iter()
            .find(|el| el.id == id)
            .unwrap();
        assert_eq!(created.kind, ElementKind::Class);
        assert_eq!(created.name(), "ObjecttypeNew");
        assert_eq!(created.stereotype.as_ref().unwrap().id, objecttype_id);
    }

    #[test]
    fn add_attribuut_requires_an_objecttype() {
        let mut root = project();
        let err = add_attribuut(&mut root, "GeslachtKeuze").unwrap_err();
        assert!(matches!(err, AppError::NotAnObjecttype(_)));
    }

    #[test]
    fn add_attribuut_appends_a_stereotyped_attribute() {
        let mut root = project();
        let id = add_attribuut(&mut root, "Persoon").unwrap();

        let persoon = root
            .find_all(|el| el.kind == ElementKind::Class && el.name() == "Persoon")[0];
        let attribuut = persoon.attributes.iter().find(|a| a.id == id).unwrap();
        assert_eq!(attribuut.name(), "attribuutNew");
        let attribuutsoort_id = resolve_stereotype(&root, ST_ATTRIBUUTSOORT).unwrap().id.clone();
        let persoon = root
            .find_all(|el| el.kind == ElementKind::Class && el.name() == "Persoon")[0];
        assert_eq!(
            persoon.attributes[0].stereotype.as_ref().unwrap().id,
            attribuutsoort_id
        );
    }

    #[test]
    fn add_keuze_types_the_attribute_with_the_picked_class() {
        let mut root = project();
        let mut prompt = ScriptedPrompt::selecting(vec![Some(0)]);
        let id = add_keuze(&mut root, "Persoon", &mut prompt).unwrap().unwrap();

        let geslacht_id = root
            .find_all(|el| el.name() == "GeslachtKeuze")[0]
            .id
            .clone();
        let persoon = root
            .find_all(|el| el.kind == ElementKind::Class && el.name() == "Persoon")[0];
        let attribuut = persoon.attributes.iter().find(|a| a.id == id).unwrap();
        assert_eq!(attribuut.type_ref.as_ref().unwrap().id, geslacht_id);
    }

    #[test]
    fn cancelled_keuze_picker_creates_nothing() {
        let mut root = project();
        let mut prompt = ScriptedPrompt::selecting(vec![None]);
        assert!(add_keuze(&mut root, "Persoon", &mut prompt).unwrap().is_none());

        let persoon = root
            .find_all(|el| el.kind == ElementKind::Class && el.name() == "Persoon")[0];
        assert!(persoon.attributes.is_empty());
    }

    #[test]
    fn directed_relatiesoort_gets_a_navigable_second_end() {
        let mut root = project();
        let id = create_relatiesoort(&mut root, "Persoon", "Organisatie", true).unwrap();

        let association = root.find_all(|el| el.id == id)[0];
        assert_eq!(association.name(), "DirectedRelatiesoortNew");
        let end2 = association.end2.as_ref().unwrap();
        assert_eq!(end2.extra["navigable"], "navigable");
        let persoon_id = root.find_all(|el| el.name() == "Persoon")[0].id.clone();
        let association = root.find_all(|el| el.id == id)[0];
        assert_eq!(
            association.end1.as_ref().unwrap().reference.as_ref().unwrap().id,
            persoon_id
        );
    }

    #[test]
    fn generalisatie_is_owned_by_the_subtype() {
        let mut root = project();
        let id = create_generalisatie(&mut root, "Persoon", "Organisatie").unwrap();

        let persoon = root
            .find_all(|el| el.kind == ElementKind::Class && el.name() == "Persoon")[0];
        let generalisatie = persoon.owned_elements.iter().find(|el| el.id == id).unwrap();
        assert_eq!(generalisatie.kind, ElementKind::Generalization);
        assert_eq!(generalisatie.name(), "subtype");
        assert_eq!(
            generalisatie.source.as_ref().unwrap().id,
            persoon.id
        );
    }
}
