//! Declarative helper macros.

/// Implement [`Reflectable`](crate::Reflectable) for an entity marker type
/// from a braced list of property names.
///
/// # Examples
///
/// ```rust
/// use predikit::Reflectable;
///
/// struct Show;
/// predikit::reflectable!(Show { title, rating, network });
///
/// assert_eq!(Show::entity_name(), "Show");
/// assert_eq!(Show::properties(), vec!["title", "rating", "network"]);
/// ```
#[macro_export]
macro_rules! reflectable {
    ($entity:ident { $($property:ident),* $(,)? }) => {
        impl $crate::Reflectable for $entity {
            fn entity_name() -> &'static str {
                stringify!($entity)
            }

            fn properties() -> ::std::vec::Vec<&'static str> {
                ::std::vec![$(stringify!($property)),*]
            }
        }
    };
}
