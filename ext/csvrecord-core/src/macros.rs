/// Declare a record struct together with its [`crate::CsvRecord`] impl.
///
/// Column names are the field names. A field marked `#[index]` gets a lookup
/// index; any other field attributes (doc comments, `#[allow(..)]`, serde
/// attributes) are kept on the generated struct. The struct must derive (or
/// implement) `Default`.
///
/// ```
/// csvrecord_core::csv_record! {
///     #[derive(Debug, Default, Clone, PartialEq)]
///     pub struct Address {
///         /// Unique address id
///         #[index]
///         pub id: i32,
///         #[index] pub name: String,
///         pub email: String,
///         pub height: f32,
///         pub keys: Vec<i32>,
///         pub kks: Vec<Vec<i32>>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! csv_record {
    // `#[index]` marks the pending field
    (@munch $head:tt [$($done:tt)*] [$($attrs:tt)*] $indexed:tt
        #[index] $($rest:tt)*
    ) => {
        $crate::csv_record!(@munch $head [$($done)*] [$($attrs)*] true $($rest)*);
    };
    // any other attribute is carried onto the field
    (@munch $head:tt [$($done:tt)*] [$($attrs:tt)*] $indexed:tt
        #[$attr:meta] $($rest:tt)*
    ) => {
        $crate::csv_record!(@munch $head [$($done)*] [$($attrs)* #[$attr]] $indexed $($rest)*);
    };
    (@munch $head:tt [$($done:tt)*] [$($attrs:tt)*] $indexed:tt
        $field_vis:vis $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::csv_record!(@munch $head
            [$($done)* { [$($attrs)*] $indexed [$field_vis] $field [$ty] }]
            [] false $($($rest)*)?);
    };
    (@munch
        { [$(#[$meta:meta])*] [$vis:vis] $name:ident }
        [$( { [$(#[$attr:meta])*] $indexed:tt [$field_vis:vis] $field:ident [$ty:ty] } )*]
        [] false
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$attr])* $field_vis $field: $ty, )*
        }

        impl $crate::CsvRecord for $name {
            fn describe_fields() -> ::std::vec::Vec<$crate::FieldDef> {
                ::std::vec![
                    $(
                        $crate::FieldDef::new(
                            stringify!($field),
                            <$ty as $crate::FieldType>::declared_type(),
                            $indexed,
                        ),
                    )*
                ]
            }

            #[allow(unused_assignments, unused_mut)]
            fn set_field(
                &mut self,
                position: usize,
                value: $crate::CellValue,
            ) -> $crate::Result<()> {
                let mut cursor = 0usize;
                $(
                    if position == cursor {
                        self.$field = <$ty as $crate::FieldType>::from_cell(value)?;
                        return Ok(());
                    }
                    cursor += 1;
                )*
                Err($crate::CsvRecordError::internal(format!(
                    "{} has no field at position {}",
                    stringify!($name),
                    position
                )))
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident { $($body:tt)* }
    ) => {
        $crate::csv_record!(@munch
            { [$(#[$meta])*] [$vis] $name }
            [] [] false $($body)*);
    };
}
