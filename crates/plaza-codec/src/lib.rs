/*!
# Plaza posting codec

Binary codec for the posting program's instruction data, plus the
deterministic post-id derivation both the writer and the reader side use.

The instruction layout is fixed little-endian:

```text
discriminator (8) | uri buffer (512, zero padded) | uri len (u16)
                  | content hash (32)             | client nonce (u64)
```

An earlier program revision used a 200 byte URI buffer; decoding accepts
both layouts and tells them apart by payload length alone.
*/

pub mod error;
pub mod instruction;
pub mod post_id;

pub use error::{CodecError, CodecResult};
pub use instruction::{
    build_post_instruction, discriminator, PostInstruction, LEGACY_PAYLOAD_LEN,
    LEGACY_URI_BUFFER_LEN, PAYLOAD_LEN, POST_METHOD, URI_BUFFER_LEN,
};
pub use post_id::{derive_post_id, PostId};
