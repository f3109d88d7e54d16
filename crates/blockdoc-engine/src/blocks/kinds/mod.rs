mod code;
mod control_matrix;
mod delimiter;
mod embed;
mod header;
mod image;
mod link;
mod list;
mod maturity_model;
mod paragraph;
mod process;
mod process_flow;
mod quote;
mod raw;
mod role_definition;
mod table;
mod unresolved;

pub use code::Code;
pub use control_matrix::{ControlLine, ControlMatrix, ControlRow};
pub use delimiter::Delimiter;
pub use embed::Embed;
pub use header::Header;
pub use image::{Image, ImageFile};
pub use link::{LinkMeta, LinkTool};
pub use list::{List, ListStyle};
pub use maturity_model::{MaturityLevel, MaturityModel};
pub use paragraph::Paragraph;
pub use process::{Frequency, Process, ProcessStep};
pub use process_flow::{FlowStep, ProcessFlow};
pub use quote::Quote;
pub use raw::Raw;
pub use role_definition::RoleDefinition;
pub use table::Table;
pub use unresolved::{Unresolved, UnresolvedReason};

use serde::Serialize;

use super::{BlockKind, FieldError, Form};
use crate::render::Sanitize;

/// Generates the closed payload enum and its per-variant dispatch.
macro_rules! block_data {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Payload of one block, tagged by block type.
        #[derive(Debug, Clone, PartialEq)]
        pub enum BlockData {
            $($variant($ty),)+
            /// Record kept verbatim because its type or data could not be resolved
            Unresolved(Unresolved),
        }

        impl BlockData {
            /// Wire type id of this payload
            pub fn type_id(&self) -> &str {
                match self {
                    $(Self::$variant(_) => <$ty as BlockKind>::TYPE_ID,)+
                    Self::Unresolved(u) => u.type_id.as_str(),
                }
            }

            /// Wire representation of the payload (the record's `data` field)
            pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
                serde_json::to_value(self)
            }

            pub fn validate(&self) -> Vec<FieldError> {
                match self {
                    $(Self::$variant(inner) => inner.validate(),)+
                    Self::Unresolved(u) => u.validate(),
                }
            }

            pub fn render(&self, sanitizer: &dyn Sanitize) -> String {
                match self {
                    $(Self::$variant(inner) => inner.render(sanitizer),)+
                    Self::Unresolved(u) => u.render(),
                }
            }

            pub fn form(&self) -> Form {
                match self {
                    $(Self::$variant(inner) => inner.form(),)+
                    Self::Unresolved(u) => u.form(),
                }
            }

            pub fn is_unresolved(&self) -> bool {
                matches!(self, Self::Unresolved(_))
            }
        }

        impl serde::Serialize for BlockData {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                match self {
                    $(Self::$variant(inner) => inner.serialize(serializer),)+
                    Self::Unresolved(u) => u.data.serialize(serializer),
                }
            }
        }

        $(
            impl From<$ty> for BlockData {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

block_data! {
    Paragraph(Paragraph),
    Header(Header),
    List(List),
    Quote(Quote),
    Delimiter(Delimiter),
    Table(Table),
    Code(Code),
    Raw(Raw),
    Embed(Embed),
    Image(Image),
    LinkTool(LinkTool),
    Process(Process),
    ControlMatrix(ControlMatrix),
    RoleDefinition(RoleDefinition),
    MaturityModel(MaturityModel),
    ProcessFlow(ProcessFlow),
}

impl From<Unresolved> for BlockData {
    fn from(value: Unresolved) -> Self {
        Self::Unresolved(value)
    }
}
